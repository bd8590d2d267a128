//! Catalogue listing parameters.
//!
//! Raw query values are parsed leniently: unknown sort keys fall back to
//! identity order and unknown directions to ascending, so a listing request
//! never fails on presentation options.

use pagination::PageRequest;

/// Sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Parse `asc`/`desc` case-insensitively; anything else is ascending.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Allowed hero sort columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeroSortKey {
    /// Stable identity order.
    #[default]
    Id,
    /// Alphabetical by name.
    Name,
    /// By damage.
    Damage,
    /// By speed.
    Speed,
}

impl HeroSortKey {
    /// Parse an allow-listed key; anything else sorts by id.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("name") => Self::Name,
            Some("damage") => Self::Damage,
            Some("speed") => Self::Speed,
            _ => Self::Id,
        }
    }
}

/// Allowed spell sort columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpellSortKey {
    /// Stable identity order.
    #[default]
    Id,
    /// Alphabetical by name.
    Name,
    /// By damage.
    Damage,
}

impl SpellSortKey {
    /// Parse an allow-listed key; anything else sorts by id.
    #[must_use]
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("name") => Self::Name,
            Some("damage") => Self::Damage,
            _ => Self::Id,
        }
    }
}

/// Case-insensitive substring filter on item names.
///
/// An empty filter matches everything. Wildcard characters in the input
/// are matched literally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter(Option<String>);

impl NameFilter {
    /// Build a filter from raw input; blank input matches all names.
    #[must_use]
    pub fn new(raw: Option<&str>) -> Self {
        Self(
            raw.map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        )
    }

    /// Filter text, when one is active.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `name` passes the filter.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.0.as_deref().is_none_or(|needle| {
            name.to_lowercase().contains(&needle.to_lowercase())
        })
    }

    /// SQL `LIKE` pattern with `\`, `%` and `_` escaped.
    ///
    /// # Examples
    /// ```
    /// use arena_backend::domain::NameFilter;
    ///
    /// let filter = NameFilter::new(Some("50%_off"));
    /// assert_eq!(filter.like_pattern().as_deref(), Some("%50\\%\\_off%"));
    /// ```
    #[must_use]
    pub fn like_pattern(&self) -> Option<String> {
        self.0.as_deref().map(|needle| {
            let mut pattern = String::with_capacity(needle.len() + 2);
            pattern.push('%');
            for ch in needle.chars() {
                if matches!(ch, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }
}

/// A normalised hero listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroListing {
    /// Sort column.
    pub sort: HeroSortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// Name filter.
    pub name: NameFilter,
    /// Page window.
    pub page: PageRequest,
}

/// A normalised spell listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellListing {
    /// Sort column.
    pub sort: SpellSortKey,
    /// Sort direction.
    pub direction: SortDirection,
    /// Name filter.
    pub name: NameFilter,
    /// Page window.
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("name"), HeroSortKey::Name)]
    #[case(Some("Speed"), HeroSortKey::Speed)]
    #[case(Some("damage"), HeroSortKey::Damage)]
    #[case(Some("price; DROP TABLE heroes"), HeroSortKey::Id)]
    #[case(Some(""), HeroSortKey::Id)]
    #[case(None, HeroSortKey::Id)]
    fn hero_sort_key_falls_back_to_id(#[case] raw: Option<&str>, #[case] expected: HeroSortKey) {
        assert_eq!(HeroSortKey::parse_or_default(raw), expected);
    }

    #[rstest]
    #[case(Some("speed"), SpellSortKey::Id)]
    #[case(Some("damage"), SpellSortKey::Damage)]
    fn spell_sort_key_has_no_speed(#[case] raw: Option<&str>, #[case] expected: SpellSortKey) {
        assert_eq!(SpellSortKey::parse_or_default(raw), expected);
    }

    #[rstest]
    #[case(Some("DESC"), SortDirection::Desc)]
    #[case(Some("asc"), SortDirection::Asc)]
    #[case(Some("sideways"), SortDirection::Asc)]
    #[case(None, SortDirection::Asc)]
    fn direction_falls_back_to_asc(#[case] raw: Option<&str>, #[case] expected: SortDirection) {
        assert_eq!(SortDirection::parse_or_default(raw), expected);
    }

    #[rstest]
    #[case(None, "Knight", true)]
    #[case(Some("  "), "Knight", true)]
    #[case(Some("nig"), "Knight", true)]
    #[case(Some("KNI"), "Knight", true)]
    #[case(Some("giant"), "Knight", false)]
    #[case(Some("%"), "Knight", false)]
    fn name_filter_is_case_insensitive_substring(
        #[case] raw: Option<&str>,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(NameFilter::new(raw).matches(name), expected);
    }

    #[rstest]
    fn empty_filter_has_no_pattern() {
        assert_eq!(NameFilter::new(Some("")).like_pattern(), None);
    }

    #[rstest]
    fn like_pattern_escapes_backslash() {
        let filter = NameFilter::new(Some("a\\b"));
        assert_eq!(filter.like_pattern().as_deref(), Some("%a\\\\b%"));
    }
}
