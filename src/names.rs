//! Town-name normalization.
//!
//! Mission metadata, editor markers, and grad_meh geodata spell the same
//! settlement three different ways. Comparisons between corpora go through
//! [`normalize_town_name`] (or [`normalize_mission_town_name`] for names
//! taken from mission `disabledTowns` entries), never through raw strings.
//!
//! Normalization is idempotent by construction: every table entry below
//! contains at least one character the pipeline removes (an uppercase
//! letter, an underscore, a space, or punctuation), so no rule can match
//! its own output a second time.

/// Map-specific misspellings, keyed by the exact source spelling.
const TYPO_SUBSTITUTIONS: &[(&str, &str)] = &[
    // chernarusredux
    ("Kumyrna", "Kumirna"),
    // fapovo
    ("Gravette", "Gravete"),
    // brf_sumava
    ("Mokropsy", "Mokropsi"),
    // esseker
    ("Vushniory", "Vushinory"),
];

/// Settlement-type prefixes used inconsistently across corpora.
const NAME_PREFIXES: &[&str] = &["Al ", "Al-", "El ", "El-", "Stadt_", "Dorf_"];

/// Settlement-type suffixes used inconsistently across corpora.
const NAME_SUFFIXES: &[&str] = &[" City", " Village", " Island"];

/// Decorative characters dropped before comparison.
const STRIPPED_CHARS: &[char] = &[' ', '\t', '_', '-', '\'', '.', ','];

/// Prefixes that only carry meaning in mission `disabledTowns` entries,
/// where markers for castles, islands and landmarks share the namespace
/// with towns.
pub const DISABLED_TOWNS_IGNORED_PREFIXES: &[&str] = &[
    "castle_",
    "Castle_",
    "Insel_",
    "Island_",
    "LandMark_",
    "Malden_C_",
    "Malden_L_",
    "Malden_V_",
    "mil_",
    "pass_",
];

/// Normalizes a town name from map metadata or geodata.
pub fn normalize_town_name(raw: &str) -> String {
    normalize(raw)
}

/// Normalizes a town name taken from a mission `disabledTowns` entry.
///
/// Strips at most one ignored marker-namespace prefix, then applies the
/// same rules as [`normalize_town_name`].
pub fn normalize_mission_town_name(raw: &str) -> String {
    let mut name = raw;
    for prefix in DISABLED_TOWNS_IGNORED_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
            break;
        }
    }
    normalize(name)
}

fn normalize(raw: &str) -> String {
    let mut name = raw.to_string();
    for (typo, fixed) in TYPO_SUBSTITUTIONS {
        if name.contains(typo) {
            name = name.replace(typo, fixed);
        }
    }
    for prefix in NAME_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.to_string();
            break;
        }
    }
    for suffix in NAME_SUFFIXES {
        if let Some(rest) = name.strip_suffix(suffix) {
            name = rest.to_string();
            break;
        }
    }
    name.retain(|c| !STRIPPED_CHARS.contains(&c));
    fold_accents(&name).to_lowercase()
}

/// Replaces accented latin letters with their base letter, preserving case.
///
/// Covers the alphabets seen in the map corpora (Greek-latinized, Slavic,
/// German, French, Spanish, Nordic and Turkish town names). Unknown
/// characters pass through unchanged.
fn fold_accents(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ą' | 'ă' => out.push('a'),
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ą' | 'Ă' => out.push('A'),
            'ç' | 'ć' | 'č' => out.push('c'),
            'Ç' | 'Ć' | 'Č' => out.push('C'),
            'ď' | 'đ' => out.push('d'),
            'Ď' | 'Đ' => out.push('D'),
            'é' | 'è' | 'ê' | 'ë' | 'ě' | 'ę' => out.push('e'),
            'É' | 'È' | 'Ê' | 'Ë' | 'Ě' | 'Ę' => out.push('E'),
            'ğ' => out.push('g'),
            'Ğ' => out.push('G'),
            'í' | 'ì' | 'î' | 'ï' | 'ı' => out.push('i'),
            'Í' | 'Ì' | 'Î' | 'Ï' | 'İ' => out.push('I'),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'ñ' | 'ń' | 'ň' => out.push('n'),
            'Ñ' | 'Ń' | 'Ň' => out.push('N'),
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ő' => out.push('o'),
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ø' | 'Ő' => out.push('O'),
            'ř' => out.push('r'),
            'Ř' => out.push('R'),
            'ś' | 'š' | 'ş' => out.push('s'),
            'Ś' | 'Š' | 'Ş' => out.push('S'),
            'ť' => out.push('t'),
            'Ť' => out.push('T'),
            'ú' | 'ù' | 'û' | 'ü' | 'ů' | 'ű' => out.push('u'),
            'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ů' | 'Ű' => out.push('U'),
            'ý' | 'ÿ' => out.push('y'),
            'Ý' => out.push('Y'),
            'ź' | 'ž' | 'ż' => out.push('z'),
            'Ź' | 'Ž' | 'Ż' => out.push('Z'),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("Ae"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("Oe"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize_town_name("Oreokastro"), "oreokastro");
        assert_eq!(normalize_town_name("Agia Marina"), "agiamarina");
        assert_eq!(normalize_town_name("Saint-Pierre"), "saintpierre");
        assert_eq!(normalize_town_name("N'Djenahoud"), "ndjenahoud");
    }

    #[test]
    fn test_accent_folding() {
        assert_eq!(normalize_town_name("Château d'Oréon"), "chateaudoreon");
        assert_eq!(normalize_town_name("Groß Twülpstedt"), "grosstwulpstedt");
        assert_eq!(normalize_town_name("Šumava"), "sumava");
        assert_eq!(normalize_town_name("Çanakkale"), "canakkale");
    }

    #[test]
    fn test_typo_substitution() {
        assert_eq!(normalize_town_name("Kumyrna"), "kumirna");
        assert_eq!(normalize_town_name("Kumirna"), "kumirna");
    }

    #[test]
    fn test_prefix_and_suffix_stripping() {
        assert_eq!(normalize_town_name("Al Rayak"), "rayak");
        assert_eq!(normalize_town_name("El-Alamein"), "alamein");
        assert_eq!(normalize_town_name("Tuvanaka Island"), "tuvanaka");
    }

    #[test]
    fn test_disabled_towns_prefix_stripping() {
        assert_eq!(normalize_mission_town_name("castle_Oreokastro"), "oreokastro");
        assert_eq!(normalize_mission_town_name("Castle_Devin"), "devin");
        assert_eq!(normalize_mission_town_name("Malden_V_Arudy"), "arudy");
        // only meaningful in mission entries
        assert_eq!(normalize_town_name("castle_Oreokastro"), "castleoreokastro");
    }

    #[test]
    fn test_strips_at_most_one_ignored_prefix() {
        assert_eq!(normalize_mission_town_name("castle_mil_Keep"), "milkeep");
    }

    #[test]
    fn test_matching_across_corpora() {
        // mission disabledTowns entry vs geodata name
        assert_eq!(
            normalize_mission_town_name("castle_Oreokastro"),
            normalize_town_name("Oreokastro"),
        );
        // metadata spelling vs geodata spelling
        assert_eq!(
            normalize_town_name("AgiaMarina"),
            normalize_town_name("Agia Marina"),
        );
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "Oreokastro",
            "castle_Oreokastro",
            "Agia Marina",
            "Château d'Oréon",
            "Kumyrna",
            "Al Rayak",
            "Tuvanaka Island",
            "Groß Twülpstedt",
            "UNKNOWN_3",
        ] {
            let once = normalize_town_name(raw);
            assert_eq!(normalize_town_name(&once), once, "not idempotent for {raw:?}");
            let once = normalize_mission_town_name(raw);
            assert_eq!(
                normalize_mission_town_name(&once),
                once,
                "not idempotent for {raw:?}"
            );
        }
    }

    #[test]
    fn test_no_rule_matches_its_own_output() {
        // the idempotence guarantee relies on every table entry containing
        // a character the pipeline removes
        let survives = |s: &str| normalize_town_name(s) == s;
        for (typo, _) in TYPO_SUBSTITUTIONS {
            assert!(!survives(typo), "typo key {typo:?} survives normalization");
        }
        for prefix in NAME_PREFIXES.iter().chain(NAME_SUFFIXES) {
            assert!(!survives(prefix), "affix {prefix:?} survives normalization");
        }
        for prefix in DISABLED_TOWNS_IGNORED_PREFIXES {
            assert!(
                normalize_town_name(prefix) != *prefix,
                "ignored prefix {prefix:?} survives normalization"
            );
        }
    }
}
