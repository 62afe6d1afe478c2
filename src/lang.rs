use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

macro_rules! languages {
    ($($variant:ident => $code:literal,)+) => {
        /// A dictionary locale that can be fetched and checked against.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Language {
            $($variant,)+
        }

        impl Language {
            /// Every supported locale, in code order.
            pub const ALL: &'static [Language] = &[$(Language::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Language::$variant => $code,)+
                }
            }
        }

        impl FromStr for Language {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Language::$variant),)+
                    other => Err(Error::UnknownLanguage(other.to_string())),
                }
            }
        }
    };
}

languages! {
    Bg => "bg",
    Br => "br",
    Ca => "ca",
    CaValencia => "ca-valencia",
    Cs => "cs",
    Cy => "cy",
    Da => "da",
    De => "de",
    DeAt => "de-at",
    DeCh => "de-ch",
    El => "el",
    ElPolyton => "el-polyton",
    En => "en",
    EnAu => "en-au",
    EnCa => "en-ca",
    EnGb => "en-gb",
    EnZa => "en-za",
    Eo => "eo",
    Es => "es",
    EsAr => "es-ar",
    EsBo => "es-bo",
    EsCl => "es-cl",
    EsCo => "es-co",
    EsCr => "es-cr",
    EsCu => "es-cu",
    EsDo => "es-do",
    EsEc => "es-ec",
    EsGt => "es-gt",
    EsHn => "es-hn",
    EsMx => "es-mx",
    EsNi => "es-ni",
    EsPa => "es-pa",
    EsPe => "es-pe",
    EsPh => "es-ph",
    EsPr => "es-pr",
    EsPy => "es-py",
    EsSv => "es-sv",
    EsUs => "es-us",
    EsUy => "es-uy",
    EsVe => "es-ve",
    Et => "et",
    Eu => "eu",
    Fa => "fa",
    Fo => "fo",
    Fr => "fr",
    Fur => "fur",
    Fy => "fy",
    Ga => "ga",
    Gd => "gd",
    Gl => "gl",
    He => "he",
    Hr => "hr",
    Hu => "hu",
    Hy => "hy",
    Hyw => "hyw",
    Ia => "ia",
    Ie => "ie",
    Is => "is",
    It => "it",
    Ka => "ka",
    Ko => "ko",
    La => "la",
    Lb => "lb",
    Lt => "lt",
    Ltg => "ltg",
    Lv => "lv",
    Mk => "mk",
    Mn => "mn",
    Nb => "nb",
    Nds => "nds",
    Ne => "ne",
    Nl => "nl",
    Nn => "nn",
    Oc => "oc",
    Pl => "pl",
    Pt => "pt",
    PtPt => "pt-pt",
    Ro => "ro",
    Ru => "ru",
    Rw => "rw",
    Sk => "sk",
    Sl => "sl",
    Sr => "sr",
    SrLatn => "sr-latn",
    Sv => "sv",
    SvFi => "sv-fi",
    Tk => "tk",
    Tlh => "tlh",
    TlhLatn => "tlh-latn",
    Tr => "tr",
    Uk => "uk",
    Vi => "vi",
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
