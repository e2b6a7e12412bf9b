//! Language tag registry: FLORES codes, segmentation delimiters, model routing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TranslationError};

/// FLORES-style language tag (e.g. `eng_Latn`, `hin_Deva`)
///
/// Opaque to callers; the registry below resolves it to an ISO code, a
/// segmentation delimiter class and a model routing side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Wrap a raw tag; validity is checked at use sites against the registry
    pub fn new(code: impl Into<String>) -> Self {
        LanguageTag(code.into())
    }

    /// The raw FLORES code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this tag denotes the default (English) language variant
    pub fn is_english(&self) -> bool {
        self.0 == "eng_Latn"
    }

    /// Registry entry for this tag, if registered
    pub fn entry(&self) -> Option<&'static Language> {
        LANGUAGES.iter().find(|l| l.flores == self.0)
    }

    /// Registry entry, or an error for unregistered tags
    pub fn resolve(&self) -> Result<&'static Language> {
        self.entry()
            .ok_or_else(|| TranslationError::unsupported_language(&self.0))
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(code: &str) -> Self {
        LanguageTag::new(code)
    }
}

/// Delimiter class selecting the sentence-split pattern for a script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterClass {
    /// Latin scripts: `.`, `?`, `!`
    Latin,
    /// Brahmic scripts: danda, double danda, `?`, `!`, `.`
    Brahmic,
    /// Perso-Arabic scripts: Arabic full stop / question mark, `?`, `!`, `.`
    PersoArabic,
}

/// Routing side of a language (which model family handles it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// English
    English,
    /// Any supported Indic language
    Indic,
}

/// One registry entry
#[derive(Debug)]
pub struct Language {
    /// FLORES code
    pub flores: &'static str,
    /// Two-letter ISO-ish code used by the segmentation layer
    pub iso: &'static str,
    /// Delimiter class for sentence splitting
    pub delimiters: DelimiterClass,
    /// Routing side
    pub side: Side,
}

/// Supported languages (FLORES code, ISO code, delimiter class, side)
pub static LANGUAGES: &[Language] = &[
    Language { flores: "eng_Latn", iso: "en", delimiters: DelimiterClass::Latin, side: Side::English },
    Language { flores: "asm_Beng", iso: "as", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "awa_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "ben_Beng", iso: "bn", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "bho_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "brx_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "doi_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "gom_Deva", iso: "kK", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "guj_Gujr", iso: "gu", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "hin_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "hne_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "kan_Knda", iso: "kn", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "kas_Arab", iso: "ur", delimiters: DelimiterClass::PersoArabic, side: Side::Indic },
    Language { flores: "kas_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "kha_Latn", iso: "en", delimiters: DelimiterClass::Latin, side: Side::Indic },
    Language { flores: "lus_Latn", iso: "en", delimiters: DelimiterClass::Latin, side: Side::Indic },
    Language { flores: "mag_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "mai_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "mal_Mlym", iso: "ml", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "mar_Deva", iso: "mr", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "mni_Beng", iso: "bn", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "mni_Mtei", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "npi_Deva", iso: "ne", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "ory_Orya", iso: "or", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "pan_Guru", iso: "pa", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "san_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "sat_Olck", iso: "or", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "snd_Arab", iso: "ur", delimiters: DelimiterClass::PersoArabic, side: Side::Indic },
    Language { flores: "snd_Deva", iso: "hi", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "tam_Taml", iso: "ta", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "tel_Telu", iso: "te", delimiters: DelimiterClass::Brahmic, side: Side::Indic },
    Language { flores: "urd_Arab", iso: "ur", delimiters: DelimiterClass::PersoArabic, side: Side::Indic },
];

/// Model family handling one translation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// English to any Indic language
    EnIndic,
    /// Any Indic language to English
    IndicEn,
    /// Indic to Indic
    IndicIndic,
}

impl ModelFamily {
    /// Default distilled checkpoint for this family
    pub fn checkpoint(&self) -> &'static str {
        match self {
            ModelFamily::EnIndic => "ai4bharat/indictrans2-en-indic-dist-200M",
            ModelFamily::IndicEn => "ai4bharat/indictrans2-indic-en-dist-200M",
            ModelFamily::IndicIndic => "ai4bharat/indictrans2-indic-indic-dist-320M",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFamily::EnIndic => write!(f, "en-indic"),
            ModelFamily::IndicEn => write!(f, "indic-en"),
            ModelFamily::IndicIndic => write!(f, "indic-indic"),
        }
    }
}

/// Resolve the model family for a translation direction
///
/// Both tags must be registered; English-to-English has no model.
pub fn route(src: &LanguageTag, tgt: &LanguageTag) -> Result<ModelFamily> {
    let src_entry = src.resolve()?;
    let tgt_entry = tgt.resolve()?;
    match (src_entry.side, tgt_entry.side) {
        (Side::English, Side::Indic) => Ok(ModelFamily::EnIndic),
        (Side::Indic, Side::English) => Ok(ModelFamily::IndicEn),
        (Side::Indic, Side::Indic) => Ok(ModelFamily::IndicIndic),
        (Side::English, Side::English) => Err(TranslationError::unsupported_language(format!(
            "{} -> {}",
            src, tgt
        ))),
    }
}
