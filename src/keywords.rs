//! Keyword lists: the case-sensitive substring matcher, built-in presets, and
//! loading lists from newline-separated files.

use anyhow::{Context, Result};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Ordered keyword list matched as plain, case-sensitive substrings.
/// No tokenization and no word boundaries: `"ár"` matches inside `"vásár"`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    /// Empty strings are dropped (they would match every record); everything else
    /// is kept verbatim, including inner and surrounding spaces.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        set.extend(words);
        set
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // An empty keyword would be a substring of every body and retain the
        // whole input, so it is dropped instead of matching.
        self.words.extend(words.into_iter().map(Into::into).filter(|w| !w.is_empty()));
    }

    /// Read one keyword per line. Blank lines and lines starting with `#` are ignored;
    /// trailing `\r` is stripped but the keyword itself is otherwise untouched.
    pub fn from_file(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("open keywords file {}", path.display()))?;
        let mut words = Vec::new();
        for line in BufReader::new(f).lines() {
            let line = line.with_context(|| format!("read keywords file {}", path.display()))?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            words.push(line.to_string());
        }
        Ok(Self::new(words))
    }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
    pub fn len(&self) -> usize { self.words.len() }
    pub fn as_slice(&self) -> &[String] { &self.words }

    /// True iff at least one keyword occurs in `text`. An empty set never matches.
    #[inline]
    pub fn matches(&self, text: &str) -> bool {
        self.words.iter().any(|kw| text.contains(kw.as_str()))
    }

}

/// Built-in keyword lists for price/cost discussion in several languages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    English,
    EnglishExtended,
    Greek,
    Hungarian,
}

const ENGLISH: &[&str] = &[
    "price", "cost", "inflation", "deflation", "expensive", "cheap", "purchase", "sale",
    "increasing", "decreasing", "rising", "falling", "affordable", "unaffordable",
];

const ENGLISH_EXTENDED: &[&str] = &[
    "overpriced", "underpriced", "valuable", "worthless", "bargain", "discount",
    "markup", "savings", "spending", "budget", "wages", "salary", "profits", "losses",
];

const GREEK: &[&str] = &[
    "τιμή", "κόστος", "πληθωρισμός", "αποπληθωρισμός", "ακριβός", "φθηνός", "αγορά", "πώληση",
    "αυξάνεται", "μειώνεται", "προσιτός", "μη προσιτός", "υπερτιμημένος", "υποτιμημένος",
    "πολύτιμος", "άνευ αξίας", "ευκαιρία", "έκπτωση", "περιθώριο κέρδους", "εξοικονομήσεις",
    "δαπάνες", "προϋπολογισμός", "μισθοί", "μισθός", "κέρδη", "ζημίες",
];

const HUNGARIAN: &[&str] = &[
    "ár", "költség", "infláció", "defláció", "drága", "olcsó", "vásárlás", "akció",
    "növekvő", "csökkenő", "emelkedő", "megfizethető", "megfizethetetlen", "túlárazott",
    "alulárazott", "értékes", "értéktelen", "alku", "kedvezmény", "felár", "megtakarítás",
    "kiadás", "költségvetés", "bérek", "fizetés", "nyereség", "veszteség",
];

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::English, Preset::EnglishExtended, Preset::Greek, Preset::Hungarian];

    pub fn name(self) -> &'static str {
        match self {
            Preset::English => "english",
            Preset::EnglishExtended => "english-extended",
            Preset::Greek => "greek",
            Preset::Hungarian => "hungarian",
        }
    }

    /// The preset's keywords in order. `english-extended` is the English base list
    /// followed by its additions.
    pub fn words(self) -> Vec<&'static str> {
        match self {
            Preset::English => ENGLISH.to_vec(),
            Preset::EnglishExtended => ENGLISH.iter().chain(ENGLISH_EXTENDED).copied().collect(),
            Preset::Greek => GREEK.to_vec(),
            Preset::Hungarian => HUNGARIAN.to_vec(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
                format!("unknown keyword preset {s:?} (expected one of: {})", names.join(", "))
            })
    }
}
