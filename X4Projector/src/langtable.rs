//! Language alias table.
//!
//! The game names its localization files after country calling codes
//! (`t/0001-L044.xml` is English). This table maps human-friendly aliases
//! onto those files.

/// Localization file paths and the aliases that select them.
pub const LANG_TABLE: &[(&str, &[&str])] = &[
    (
        "t/0001-L007.xml",
        &["ru", "rus", "russian", "russkij", "russkiy", "русский"],
    ),
    ("t/0001-L033.xml", &["fr", "fra", "fre", "french", "français"]),
    ("t/0001-L034.xml", &["es", "sp", "spa", "spanish", "español"]),
    ("t/0001-L039.xml", &["it", "ita", "italian", "italiano"]),
    ("t/0001-L044.xml", &["en", "eng", "english"]),
    (
        "t/0001-L049.xml",
        &["ge", "de", "ger", "deu", "german", "deutsch", "deutsche"],
    ),
    ("t/0001-L055.xml", &["pt", "por", "portuguese", "português"]),
    ("t/0001-L081.xml", &["ja", "jpn", "japanese", "日本語", "nihongo"]),
    (
        "t/0001-L082.xml",
        &["ko", "kor", "korean", "한국어", "韓國語", "hangugeo"],
    ),
    (
        "t/0001-L086.xml",
        &[
            "zh", "zh-cn", "chi", "chi-cn", "zho", "zho-cn", "chinese", "chinese-cn", "汉语",
            "hànyǔ",
        ],
    ),
    (
        "t/0001-L088.xml",
        &["zh-tw", "chi-tw", "zho-tw", "chinese-tw", "漢語"],
    ),
];

/// The localization file for a language alias, if the alias is known.
/// Matching is case-insensitive.
#[must_use]
pub fn lang_file_for(alias: &str) -> Option<&'static str> {
    let alias = alias.trim().to_lowercase();
    LANG_TABLE
        .iter()
        .find(|(_, aliases)| aliases.contains(&alias.as_str()))
        .map(|(path, _)| *path)
}
