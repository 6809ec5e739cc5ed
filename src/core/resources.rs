use crate::utils::error::RawgError;
use std::fmt;
use std::str::FromStr;

/// Named resource collections that share the list/detail shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Genres,
    Platforms,
    Developers,
    Publishers,
    Stores,
    Tags,
    Creators,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Genres,
        ResourceKind::Platforms,
        ResourceKind::Developers,
        ResourceKind::Publishers,
        ResourceKind::Stores,
        ResourceKind::Tags,
        ResourceKind::Creators,
    ];

    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Genres => "genres",
            ResourceKind::Platforms => "platforms",
            ResourceKind::Developers => "developers",
            ResourceKind::Publishers => "publishers",
            ResourceKind::Stores => "stores",
            ResourceKind::Tags => "tags",
            ResourceKind::Creators => "creators",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for ResourceKind {
    type Err = RawgError;

    /// Accepts the plural path name or its singular form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| {
                let plural = kind.path_segment();
                name == plural || Some(name.as_str()) == plural.strip_suffix('s')
            })
            .ok_or_else(|| RawgError::InvalidConfigValueError {
                field: "kind".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Valid kinds: {}",
                    ResourceKind::ALL.map(ResourceKind::path_segment).join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plural_and_singular() {
        assert_eq!("genres".parse::<ResourceKind>().unwrap(), ResourceKind::Genres);
        assert_eq!("Genre".parse::<ResourceKind>().unwrap(), ResourceKind::Genres);
        assert_eq!("store".parse::<ResourceKind>().unwrap(), ResourceKind::Stores);
        assert_eq!(
            "creators".parse::<ResourceKind>().unwrap(),
            ResourceKind::Creators
        );
    }

    #[test]
    fn test_unknown_kind_lists_valid_values() {
        let err = "consoles".parse::<ResourceKind>().unwrap_err();
        assert!(err.to_string().contains("genres, platforms"));
    }

    #[test]
    fn test_display_matches_path() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.to_string(), kind.path_segment());
        }
    }
}
