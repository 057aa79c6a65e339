use serde::Serialize;

/// The five test organisms of a preservation test.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum_macros::Display,
)]
pub enum Strain {
    #[strum(to_string = "E.coli")]
    #[serde(rename = "E.coli")]
    EColi,
    #[strum(to_string = "P.aeruginosa")]
    #[serde(rename = "P.aeruginosa")]
    PAeruginosa,
    #[strum(to_string = "S.aureus")]
    #[serde(rename = "S.aureus")]
    SAureus,
    #[strum(to_string = "C.albicans")]
    #[serde(rename = "C.albicans")]
    CAlbicans,
    #[strum(to_string = "A.brasiliensis")]
    #[serde(rename = "A.brasiliensis")]
    ABrasiliensis,
}

/// Lowercased names in match order: abbreviated and binomial forms first,
/// then genus-only forms.
const NAMES: &[(&str, Strain)] = &[
    ("e.coli", Strain::EColi),
    ("escherichia coli", Strain::EColi),
    ("e. coli", Strain::EColi),
    ("p.aeruginosa", Strain::PAeruginosa),
    ("pseudomonas aeruginosa", Strain::PAeruginosa),
    ("p. aeruginosa", Strain::PAeruginosa),
    ("s.aureus", Strain::SAureus),
    ("staphylococcus aureus", Strain::SAureus),
    ("s. aureus", Strain::SAureus),
    ("c.albicans", Strain::CAlbicans),
    ("candida albicans", Strain::CAlbicans),
    ("c. albicans", Strain::CAlbicans),
    ("a.brasiliensis", Strain::ABrasiliensis),
    ("aspergillus brasiliensis", Strain::ABrasiliensis),
    ("a. brasiliensis", Strain::ABrasiliensis),
    ("escherichia", Strain::EColi),
    ("pseudomonas", Strain::PAeruginosa),
    ("staphylococcus", Strain::SAureus),
    ("candida", Strain::CAlbicans),
    ("aspergillus", Strain::ABrasiliensis),
];

impl Strain {
    /// Recognizes a strain cell: an exact case-insensitive name match first,
    /// then the first name contained in the text.
    pub fn recognize(text: &str) -> Option<Strain> {
        let text = text.trim().to_lowercase();
        if text.is_empty() {
            return None;
        }
        NAMES
            .iter()
            .find(|(name, _)| *name == text)
            .or_else(|| NAMES.iter().find(|(name, _)| text.contains(name)))
            .map(|&(_, strain)| strain)
    }

    /// True for the bacteria and the yeast; false for the mould.
    pub fn is_detection_limited(self) -> bool {
        !matches!(self, Strain::ABrasiliensis)
    }
}
