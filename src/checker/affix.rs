//! Affix rule files (`.aff`): flag encoding, prefix/suffix rules and the
//! handful of directives the bundled speller honours.
//!
//! Unknown directives (compounding, morphology, phonetic tables, ...) are
//! skipped so that richer files still load.

use regex::Regex;
use std::collections::HashMap;

use crate::error::DictionaryError;

pub type Flag = u32;

/// How flag strings are encoded, set by the `FLAG` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagMode {
    /// One character per flag.
    #[default]
    Single,
    /// Two characters per flag.
    Long,
    /// Comma separated decimal numbers.
    Numeric,
    /// One Unicode scalar per flag.
    Utf8,
}

impl FlagMode {
    pub fn parse(self, raw: &str) -> Result<Vec<Flag>, String> {
        match self {
            FlagMode::Single | FlagMode::Utf8 => Ok(raw.chars().map(|c| c as Flag).collect()),
            FlagMode::Long => {
                let chars: Vec<char> = raw.chars().collect();
                if chars.len() % 2 != 0 {
                    return Err(format!("odd number of characters in long flags `{raw}`"));
                }
                Ok(chars
                    .chunks(2)
                    .map(|pair| ((pair[0] as Flag) << 16) | (pair[1] as Flag & 0xFFFF))
                    .collect())
            }
            FlagMode::Numeric => raw
                .split(',')
                .filter(|n| !n.is_empty())
                .map(|n| {
                    n.trim()
                        .parse::<Flag>()
                        .map_err(|_| format!("invalid numeric flag `{n}`"))
                })
                .collect(),
        }
    }

    fn parse_one(self, raw: &str) -> Result<Flag, String> {
        match self.parse(raw)?.as_slice() {
            [flag] => Ok(*flag),
            _ => Err(format!("expected a single flag, found `{raw}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone)]
pub struct AffixRule {
    pub kind: AffixKind,
    pub flag: Flag,
    pub cross_product: bool,
    pub strip: String,
    pub add: String,
    pub continuation: Vec<Flag>,
    condition: Option<Regex>,
}

impl AffixRule {
    /// The form produced by attaching this affix to `stem`, if the rule's
    /// strip and condition allow it.
    pub fn apply(&self, stem: &str) -> Option<String> {
        if let Some(condition) = &self.condition {
            if !condition.is_match(stem) {
                return None;
            }
        }

        let derived = match self.kind {
            AffixKind::Suffix => {
                let base = stem.strip_suffix(self.strip.as_str())?;
                format!("{}{}", base, self.add)
            }
            AffixKind::Prefix => {
                let base = stem.strip_prefix(self.strip.as_str())?;
                format!("{}{}", self.add, base)
            }
        };

        (!derived.is_empty()).then_some(derived)
    }
}

#[derive(Debug, Default)]
pub struct AffixFile {
    pub flag_mode: FlagMode,
    pub prefixes: Vec<AffixRule>,
    pub suffixes: Vec<AffixRule>,
    pub try_chars: Vec<char>,
    pub replacements: Vec<(String, String)>,
    pub forbidden: Option<Flag>,
    pub need_affix: Option<Flag>,
    pub no_suggest: Option<Flag>,
    pub only_in_compound: Option<Flag>,
    aliases: Vec<Vec<Flag>>,
    prefix_index: HashMap<Flag, Vec<usize>>,
    suffix_index: HashMap<Flag, Vec<usize>>,
}

/// Tracks `PFX`/`SFX` blocks whose header announced more rule lines.
struct OpenBlock {
    cross_product: bool,
    remaining: usize,
}

impl AffixFile {
    pub fn parse(text: &str) -> Result<Self, DictionaryError> {
        let mut file = AffixFile::default();
        let mut open_blocks: HashMap<(AffixKind, Flag), OpenBlock> = HashMap::new();
        let mut pending_aliases = 0usize;
        let mut pending_replacements = 0usize;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let err = |reason: String| DictionaryError::affix(line_no, reason);

            match parts[0] {
                "FLAG" => {
                    file.flag_mode = match parts.get(1).copied() {
                        Some("long") => FlagMode::Long,
                        Some("num") => FlagMode::Numeric,
                        Some("UTF-8") => FlagMode::Utf8,
                        other => return Err(err(format!("unknown flag mode {other:?}"))),
                    };
                }
                "TRY" => {
                    if let Some(chars) = parts.get(1) {
                        file.try_chars = chars.chars().collect();
                    }
                }
                "FORBIDDENWORD" => file.forbidden = Some(file.directive_flag(&parts).map_err(err)?),
                "NEEDAFFIX" | "PSEUDOROOT" => {
                    file.need_affix = Some(file.directive_flag(&parts).map_err(err)?)
                }
                "NOSUGGEST" => file.no_suggest = Some(file.directive_flag(&parts).map_err(err)?),
                "ONLYINCOMPOUND" => {
                    file.only_in_compound = Some(file.directive_flag(&parts).map_err(err)?)
                }
                "AF" => {
                    let value = parts.get(1).ok_or_else(|| err("missing AF value".into()))?;
                    if pending_aliases > 0 {
                        file.aliases.push(file.flag_mode.parse(value).map_err(err)?);
                        pending_aliases -= 1;
                    } else {
                        pending_aliases = value
                            .parse()
                            .map_err(|_| err(format!("invalid AF count `{value}`")))?;
                    }
                }
                "REP" => {
                    if pending_replacements > 0 {
                        let (Some(from), Some(to)) = (parts.get(1), parts.get(2)) else {
                            return Err(err("REP entry needs a pattern and a replacement".into()));
                        };
                        file.replacements.push((rep_pattern(from), rep_pattern(to)));
                        pending_replacements -= 1;
                    } else {
                        let value = parts.get(1).ok_or_else(|| err("missing REP count".into()))?;
                        pending_replacements = value
                            .parse()
                            .map_err(|_| err(format!("invalid REP count `{value}`")))?;
                    }
                }
                "PFX" | "SFX" => {
                    let kind = if parts[0] == "PFX" {
                        AffixKind::Prefix
                    } else {
                        AffixKind::Suffix
                    };
                    if parts.len() < 4 {
                        return Err(err(format!("truncated {} line", parts[0])));
                    }
                    let flag = file.flag_mode.parse_one(parts[1]).map_err(err)?;

                    let open = match open_blocks.get_mut(&(kind, flag)) {
                        Some(block) if block.remaining > 0 => {
                            block.remaining -= 1;
                            Some(block.cross_product)
                        }
                        _ => None,
                    };

                    match open {
                        Some(cross_product) => {
                            let rule = file
                                .parse_rule(kind, flag, cross_product, &parts)
                                .map_err(err)?;
                            match kind {
                                AffixKind::Prefix => file.prefixes.push(rule),
                                AffixKind::Suffix => file.suffixes.push(rule),
                            }
                        }
                        None => {
                            let cross_product = match parts[2] {
                                "Y" => true,
                                "N" => false,
                                other => {
                                    return Err(err(format!("expected Y or N, found `{other}`")))
                                }
                            };
                            let remaining = parts[3]
                                .parse()
                                .map_err(|_| err(format!("invalid rule count `{}`", parts[3])))?;
                            open_blocks.insert(
                                (kind, flag),
                                OpenBlock {
                                    cross_product,
                                    remaining,
                                },
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        file.prefix_index = index_by_flag(&file.prefixes);
        file.suffix_index = index_by_flag(&file.suffixes);
        Ok(file)
    }

    /// Prefix rules belonging to any of `flags`.
    pub fn prefixes_with<'a>(&'a self, flags: &'a [Flag]) -> impl Iterator<Item = &'a AffixRule> {
        rules_with(&self.prefixes, &self.prefix_index, flags)
    }

    /// Suffix rules belonging to any of `flags`.
    pub fn suffixes_with<'a>(&'a self, flags: &'a [Flag]) -> impl Iterator<Item = &'a AffixRule> {
        rules_with(&self.suffixes, &self.suffix_index, flags)
    }

    fn directive_flag(&self, parts: &[&str]) -> Result<Flag, String> {
        let raw = parts
            .get(1)
            .ok_or_else(|| format!("{} needs a flag", parts[0]))?;
        self.flag_mode.parse_one(raw)
    }

    fn parse_rule(
        &self,
        kind: AffixKind,
        flag: Flag,
        cross_product: bool,
        parts: &[&str],
    ) -> Result<AffixRule, String> {
        let strip = zero_as_empty(parts[2]);
        let (add, continuation) = match parts[3].split_once('/') {
            Some((add, flags)) => (zero_as_empty(add), self.decode_flags(flags)?),
            None => (zero_as_empty(parts[3]), Vec::new()),
        };
        let condition = match parts.get(4) {
            Some(&cond) if cond != "." => Some(condition_regex(kind, cond)?),
            _ => None,
        };

        Ok(AffixRule {
            kind,
            flag,
            cross_product,
            strip,
            add,
            continuation,
            condition,
        })
    }

    /// Flags of a word-list entry or continuation class, resolving `AF`
    /// aliases when the file declares any.
    pub fn decode_flags(&self, raw: &str) -> Result<Vec<Flag>, String> {
        if self.aliases.is_empty() {
            return self.flag_mode.parse(raw);
        }
        let index: usize = raw
            .parse()
            .map_err(|_| format!("invalid flag alias `{raw}`"))?;
        index
            .checked_sub(1)
            .and_then(|i| self.aliases.get(i))
            .cloned()
            .ok_or_else(|| format!("flag alias {index} is not defined"))
    }
}

fn index_by_flag(rules: &[AffixRule]) -> HashMap<Flag, Vec<usize>> {
    let mut index: HashMap<Flag, Vec<usize>> = HashMap::new();
    for (idx, rule) in rules.iter().enumerate() {
        index.entry(rule.flag).or_default().push(idx);
    }
    index
}

fn rules_with<'a>(
    rules: &'a [AffixRule],
    index: &'a HashMap<Flag, Vec<usize>>,
    flags: &'a [Flag],
) -> impl Iterator<Item = &'a AffixRule> {
    flags
        .iter()
        .filter_map(move |flag| index.get(flag))
        .flatten()
        .map(move |&idx| &rules[idx])
}

fn zero_as_empty(field: &str) -> String {
    if field == "0" {
        String::new()
    } else {
        field.to_string()
    }
}

// `_` stands for a space; anchors are dropped.
fn rep_pattern(field: &str) -> String {
    field
        .trim_start_matches('^')
        .trim_end_matches('$')
        .replace('_', " ")
}

/// Conditions are sequences of characters, `.` and `[...]` classes with an
/// optional leading `^`. Everything else is literal.
fn condition_regex(kind: AffixKind, condition: &str) -> Result<Regex, String> {
    let mut pattern = String::new();
    let mut in_class = false;
    let mut class_start = false;

    for ch in condition.chars() {
        if in_class {
            match ch {
                ']' => {
                    in_class = false;
                    pattern.push(']');
                }
                '^' if class_start => pattern.push('^'),
                '\\' | '[' | '&' | '~' | '-' | '^' => {
                    pattern.push('\\');
                    pattern.push(ch);
                }
                _ => pattern.push(ch),
            }
            class_start = false;
        } else {
            match ch {
                '[' => {
                    in_class = true;
                    class_start = true;
                    pattern.push('[');
                }
                '.' => pattern.push('.'),
                _ => pattern.push_str(&regex::escape(&ch.to_string())),
            }
        }
    }

    if in_class {
        return Err(format!("unterminated character class in condition `{condition}`"));
    }

    let anchored = match kind {
        AffixKind::Prefix => format!("^(?:{pattern})"),
        AffixKind::Suffix => format!("(?:{pattern})$"),
    };
    Regex::new(&anchored).map_err(|e| format!("invalid condition `{condition}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EN_AFF: &str = "SET UTF-8
TRY esianrtolcdugmphbyfvkwz'
NOSUGGEST !

REP 2
REP f ph
REP ^alot$ a_lot

PFX U Y 1
PFX U 0 un .

SFX S Y 3
SFX S y ies [^aeiou]y
SFX S 0 s [aeiou]y
SFX S 0 s [^y]

SFX D N 1
SFX D 0 ed/S .
";

    #[test]
    fn test_parse_rules_and_directives() {
        let aff = AffixFile::parse(EN_AFF).unwrap();
        assert_eq!(aff.flag_mode, FlagMode::Single);
        assert_eq!(aff.prefixes.len(), 1);
        assert_eq!(aff.suffixes.len(), 4);
        assert_eq!(aff.try_chars.first(), Some(&'e'));
        assert_eq!(aff.no_suggest, Some('!' as Flag));
        assert_eq!(
            aff.replacements,
            vec![
                ("f".to_string(), "ph".to_string()),
                ("alot".to_string(), "a lot".to_string())
            ]
        );
        assert!(aff.prefixes[0].cross_product);
        assert!(!aff.suffixes[3].cross_product);
        assert_eq!(aff.suffixes[3].continuation, vec!['S' as Flag]);
    }

    #[test]
    fn test_rules_looked_up_by_flag() {
        let aff = AffixFile::parse(EN_AFF).unwrap();
        let flags = ['D' as Flag, 'U' as Flag];

        let suffixes: Vec<&str> = aff.suffixes_with(&flags).map(|r| r.add.as_str()).collect();
        assert_eq!(suffixes, vec!["ed"]);
        assert_eq!(aff.suffixes_with(&['S' as Flag]).count(), 3);
        assert_eq!(aff.prefixes_with(&flags).count(), 1);
        assert_eq!(aff.prefixes_with(&['S' as Flag]).count(), 0);
        assert_eq!(aff.suffixes_with(&[]).count(), 0);
    }

    #[test]
    fn test_suffix_conditions() {
        let aff = AffixFile::parse(EN_AFF).unwrap();
        let forms: Vec<Option<String>> = aff.suffixes[..3]
            .iter()
            .map(|rule| rule.apply("pony"))
            .collect();
        assert_eq!(forms, vec![Some("ponies".to_string()), None, None]);

        let forms: Vec<Option<String>> = aff.suffixes[..3]
            .iter()
            .map(|rule| rule.apply("day"))
            .collect();
        assert_eq!(forms, vec![None, Some("days".to_string()), None]);

        assert_eq!(aff.suffixes[2].apply("cat"), Some("cats".to_string()));
    }

    #[test]
    fn test_prefix_rule() {
        let aff = AffixFile::parse(EN_AFF).unwrap();
        assert_eq!(aff.prefixes[0].apply("do"), Some("undo".to_string()));
    }

    #[test]
    fn test_long_and_numeric_flags() {
        assert_eq!(
            FlagMode::Long.parse("AaBb").unwrap(),
            vec![
                ('A' as Flag) << 16 | 'a' as Flag,
                ('B' as Flag) << 16 | 'b' as Flag
            ]
        );
        assert!(FlagMode::Long.parse("AaB").is_err());
        assert_eq!(FlagMode::Numeric.parse("101,2").unwrap(), vec![101, 2]);
        assert!(FlagMode::Numeric.parse("1,x").is_err());
    }

    #[test]
    fn test_aliases() {
        let aff = AffixFile::parse("AF 2\nAF AB\nAF C\nSFX C Y 1\nSFX C 0 s .\n").unwrap();
        assert_eq!(aff.decode_flags("1").unwrap(), vec!['A' as Flag, 'B' as Flag]);
        assert_eq!(aff.decode_flags("2").unwrap(), vec!['C' as Flag]);
        assert!(aff.decode_flags("3").is_err());
        assert!(aff.decode_flags("0").is_err());
    }

    #[test]
    fn test_condition_literals_are_escaped() {
        let regex = condition_regex(AffixKind::Suffix, "[^-]e+").unwrap();
        assert!(regex.is_match("ae+"));
        assert!(!regex.is_match("aee"));
        assert!(!regex.is_match("-e+"));
    }

    #[test]
    fn test_malformed_lines_report_position() {
        let err = AffixFile::parse("SET UTF-8\nSFX S X 1\n").unwrap_err();
        assert_eq!(err.to_string(), "affix file line 2: expected Y or N, found `X`");

        let err = AffixFile::parse("FLAG bogus\n").unwrap_err();
        assert!(err.to_string().starts_with("affix file line 1:"));

        assert!(AffixFile::parse("SFX S Y 1\nSFX S 0 s [ab\n").is_err());
    }

    #[test]
    fn test_unknown_directives_skipped() {
        let aff = AffixFile::parse("COMPOUNDMIN 3\nKEY qwertyuiop\nWORDCHARS 0123456789\n").unwrap();
        assert!(aff.suffixes.is_empty());
        assert!(aff.prefixes.is_empty());
    }
}
