use std::collections::HashSet;

/// Resolves the localities a free-text query refers to.
///
/// Pass one keeps every known name that occurs in the query, ignoring case.
/// If that finds nothing, the query is split into words longer than two
/// characters and a locality is kept when its name contains any of them.
/// Results follow the order of `known` and contain no duplicates.
pub fn extract_localities(query: &str, known: &[&str]) -> Vec<String> {
    if !query.chars().any(char::is_alphabetic) {
        return Vec::new();
    }
    let text = query.to_lowercase();

    let direct = dedup(known.iter().copied().filter(|name| {
        let name = name.to_lowercase();
        !name.is_empty() && text.contains(&name)
    }));
    if !direct.is_empty() {
        return direct;
    }

    let tokens: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|w| w.chars().count() > 2)
        .collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    dedup(known.iter().copied().filter(|name| {
        let name = name.to_lowercase();
        tokens.iter().any(|token| name.contains(token))
    }))
}

fn dedup<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &[&str] = &["Wakad", "Aundh", "Baner", "Pimple Saudagar"];

    #[test]
    fn matches_names_case_insensitively() {
        assert_eq!(extract_localities("How is WAKAD doing?", KNOWN), ["Wakad"]);
        assert_eq!(
            extract_localities("compare baner and wakad", KNOWN),
            ["Wakad", "Baner"]
        );
    }

    #[test]
    fn multi_word_names_match_as_substrings() {
        assert_eq!(
            extract_localities("prices in pimple saudagar", KNOWN),
            ["Pimple Saudagar"]
        );
    }

    #[test]
    fn falls_back_to_token_overlap() {
        // "pimple" alone is not a full locality name.
        assert_eq!(extract_localities("show pimple, trends", KNOWN), ["Pimple Saudagar"]);
        // Short tokens never match.
        assert!(extract_localities("an of ba", KNOWN).is_empty());
    }

    #[test]
    fn token_fallback_only_runs_without_direct_hits() {
        let known = ["Wakad", "Wakad East"];
        // Direct pass finds "Wakad"; overlapping names are both kept when both occur.
        assert_eq!(extract_localities("wakad east trend", &known), ["Wakad", "Wakad East"]);
        assert_eq!(extract_localities("wakad trend", &known), ["Wakad"]);
    }

    #[test]
    fn unknown_or_non_alphabetic_queries_match_nothing() {
        assert!(extract_localities("what about mumbai?", KNOWN).is_empty());
        assert!(extract_localities("2021 ???", KNOWN).is_empty());
        assert!(extract_localities("", KNOWN).is_empty());
    }

    #[test]
    fn duplicate_known_names_are_reported_once() {
        let known = ["Wakad", "Aundh", "Wakad"];
        assert_eq!(extract_localities("wakad", &known), ["Wakad"]);
    }
}
