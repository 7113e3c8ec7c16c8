use serde::Serialize;

use crate::constants::{DEFAULT_MATCH_PREFIX_LENGTH, DEFAULT_SIMILARITY_THRESHOLD};
use crate::models::{AttachmentCandidate, StoredFile};

use super::normalize::normalize;
use super::similarity::similarity;

/// Tunables for the last, heuristic tier of the cascade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchingConfig {
    /// A fuzzy candidate must score strictly above this.
    pub similarity_threshold: f64,
    /// Leading characters compared by the prefix-containment rule. `0` disables the rule.
    pub prefix_length: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            prefix_length: DEFAULT_MATCH_PREFIX_LENGTH,
        }
    }
}

/// Which step of the cascade produced a match, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    Normalized,
    PrefixNumber,
    Similarity,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub file: StoredFile,
    pub tier: MatchTier,
    /// Similarity score, only for the `Similarity` tier.
    pub score: Option<f64>,
}

impl Resolution {
    fn at(file: &StoredFile, tier: MatchTier) -> Self {
        Self {
            file: file.clone(),
            tier,
            score: None,
        }
    }
}

/// Find the stored file a leave request reference points at.
///
/// Tiers run in order and the first tier with a match wins; inside a tier the
/// earliest file in `listing` wins. Returns `None` when nothing matches.
pub fn resolve(
    stored_ref: &str,
    listing: &[StoredFile],
    config: &MatchingConfig,
) -> Option<Resolution> {
    if stored_ref.trim().is_empty() {
        return None;
    }
    // Empty names would satisfy every containment check below.
    let files: Vec<&StoredFile> = listing.iter().filter(|f| !f.name.is_empty()).collect();

    exact(stored_ref, &files)
        .or_else(|| case_insensitive(stored_ref, &files))
        .or_else(|| normalized(stored_ref, &files))
        .or_else(|| prefix_number(stored_ref, &files))
        .or_else(|| most_similar(stored_ref, &files, config))
}

/// `stored_ref` with `.pdf` appended, when it carries no extension at all.
fn with_pdf_suffix(stored_ref: &str) -> Option<String> {
    (!stored_ref.contains('.')).then(|| format!("{}.pdf", stored_ref))
}

fn exact(stored_ref: &str, files: &[&StoredFile]) -> Option<Resolution> {
    let suffixed = with_pdf_suffix(stored_ref);
    files
        .iter()
        .find(|f| f.name == stored_ref || suffixed.as_deref() == Some(f.name.as_str()))
        .map(|f| Resolution::at(f, MatchTier::Exact))
}

fn case_insensitive(stored_ref: &str, files: &[&StoredFile]) -> Option<Resolution> {
    let wanted = stored_ref.to_lowercase();
    let suffixed = with_pdf_suffix(&wanted);
    files
        .iter()
        .find(|f| {
            let name = f.name.to_lowercase();
            name == wanted || suffixed.as_deref() == Some(name.as_str())
        })
        .map(|f| Resolution::at(f, MatchTier::CaseInsensitive))
}

fn normalized(stored_ref: &str, files: &[&StoredFile]) -> Option<Resolution> {
    let wanted = AttachmentCandidate::new(stored_ref);
    files
        .iter()
        .find(|f| {
            let candidate = AttachmentCandidate::new(&f.name);
            candidate.normalized_name == wanted.normalized_name
                || candidate.normalized_name.contains(&wanted.normalized_name)
                || wanted.normalized_name.contains(&candidate.normalized_name)
        })
        .map(|f| Resolution::at(f, MatchTier::Normalized))
}

fn prefix_number(stored_ref: &str, files: &[&StoredFile]) -> Option<Resolution> {
    let digits: String = stored_ref
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    files
        .iter()
        .find(|f| f.name.starts_with(&digits))
        .map(|f| Resolution::at(f, MatchTier::PrefixNumber))
}

/// Lowercased, `.pdf`-stripped, normalized comparison key.
fn similarity_key(name: &str) -> String {
    let lower = name.to_lowercase();
    normalize(lower.strip_suffix(".pdf").unwrap_or(&lower))
}

fn prefix(s: &str, len: usize) -> String {
    s.chars().take(len).collect()
}

fn most_similar(
    stored_ref: &str,
    files: &[&StoredFile],
    config: &MatchingConfig,
) -> Option<Resolution> {
    let wanted = similarity_key(stored_ref);
    // An empty key is a substring of everything.
    if wanted.is_empty() {
        return None;
    }
    let wanted_prefix = prefix(&wanted, config.prefix_length);

    let mut best: Option<(&StoredFile, f64)> = None;
    for file in files {
        let key = similarity_key(&file.name);
        if key.is_empty() {
            continue;
        }
        let score = similarity(&wanted, &key);
        let prefix_hit = config.prefix_length > 0
            && (key.contains(&wanted_prefix)
                || wanted.contains(&prefix(&key, config.prefix_length)));

        if score <= config.similarity_threshold && !prefix_hit {
            continue;
        }
        // Strictly greater keeps the earliest file on ties.
        if best.map(|(_, s)| score > s).unwrap_or(true) {
            best = Some((file, score));
        }
    }

    best.map(|(file, score)| Resolution {
        file: file.clone(),
        tier: MatchTier::Similarity,
        score: Some(score),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(names: &[&str]) -> Vec<StoredFile> {
        names.iter().map(|n| StoredFile::new(*n)).collect()
    }

    fn run(stored_ref: &str, names: &[&str]) -> Option<Resolution> {
        resolve(stored_ref, &listing(names), &MatchingConfig::default())
    }

    #[test]
    fn exact_match_beats_fuzzy_match() {
        let found = run(
            "emp001_7_1699999999999.pdf",
            &["emp00l_7_1699999999999.pdf", "emp001_7_1699999999999.pdf"],
        )
        .unwrap();
        assert_eq!(found.file.name, "emp001_7_1699999999999.pdf");
        assert_eq!(found.tier, MatchTier::Exact);
    }

    #[test]
    fn missing_extension_matches_pdf_in_first_tier() {
        let found = run("emp001_7_1699999999999", &["emp001_7_1699999999999.pdf"]).unwrap();
        assert_eq!(found.file.name, "emp001_7_1699999999999.pdf");
        assert_eq!(found.tier, MatchTier::Exact);
    }

    #[test]
    fn pdf_suffix_is_only_added_when_there_is_no_dot() {
        let found = run("report.v2", &["report.v2.pdf"]).unwrap();
        // Still found, but not by the exact tier.
        assert_ne!(found.tier, MatchTier::Exact);
    }

    #[test]
    fn case_insensitive_tier() {
        let found = run("Medical_Note.PDF", &["other.pdf", "medical_note.pdf"]).unwrap();
        assert_eq!(found.file.name, "medical_note.pdf");
        assert_eq!(found.tier, MatchTier::CaseInsensitive);

        let found = run("SCAN_01", &["scan_01.pdf"]).unwrap();
        assert_eq!(found.tier, MatchTier::CaseInsensitive);
    }

    #[test]
    fn normalized_tier_tolerates_ocr_confusions() {
        let found = run("emp0O1_7_scan.pdf", &["unrelated.pdf", "empoo1_7_5can.pdf"]).unwrap();
        assert_eq!(found.file.name, "empoo1_7_5can.pdf");
        assert_eq!(found.tier, MatchTier::Normalized);
    }

    #[test]
    fn normalized_tier_accepts_containment_both_ways() {
        let found = run("certificate", &["medical-certificate-final.pdf"]).unwrap();
        assert_eq!(found.tier, MatchTier::Normalized);

        let found = run("certificate-final-v2.pdf", &["certificate-final"]).unwrap();
        assert_eq!(found.tier, MatchTier::Normalized);
    }

    #[test]
    fn prefix_number_tier() {
        let found = run("434704698-abc.pdf", &["999-abc.pdf", "434704698-xyz.pdf"]).unwrap();
        assert_eq!(found.file.name, "434704698-xyz.pdf");
        assert_eq!(found.tier, MatchTier::PrefixNumber);
    }

    #[test]
    fn similarity_tier_picks_highest_score() {
        let found = run(
            "vacation_request_march.pdf",
            &["vacation_reqest_marhc.pdf", "vacation_request_mrch.pdf", "payroll.pdf"],
        )
        .unwrap();
        assert_eq!(found.tier, MatchTier::Similarity);
        assert_eq!(found.file.name, "vacation_request_mrch.pdf");
        assert!(found.score.unwrap() > 0.7);
    }

    #[test]
    fn similarity_tier_accepts_shared_prefix_below_threshold() {
        let found = run("justificante-medico-2024-enero.pdf", &["justificante-x.pdf"]).unwrap();
        assert_eq!(found.tier, MatchTier::Similarity);
        assert!(found.score.unwrap() <= 0.7);
    }

    #[test]
    fn similarity_ties_go_to_listing_order() {
        let found = run("abcdefgh-q.pdf", &["abcdefgh-x.pdf", "abcdefgh-y.pdf"]).unwrap();
        assert_eq!(found.file.name, "abcdefgh-x.pdf");
    }

    #[test]
    fn threshold_is_configurable() {
        let files = listing(&["vacation_reqest_marhc.pdf"]);
        let strict = MatchingConfig {
            similarity_threshold: 0.99,
            prefix_length: 0,
        };
        assert!(resolve("vacation_request_march.pdf", &files, &strict).is_none());
        assert!(resolve("vacation_request_march.pdf", &files, &MatchingConfig::default()).is_some());
    }

    #[test]
    fn nothing_matches() {
        assert!(run("payslip.pdf", &["holiday.pdf", "travel.pdf"]).is_none());
        assert!(run("payslip.pdf", &[]).is_none());
    }

    #[test]
    fn blank_reference_and_empty_names_never_match() {
        assert!(run("", &["a.pdf"]).is_none());
        assert!(run("   ", &["a.pdf"]).is_none());
        assert!(run("zzz-unrelated", &[""]).is_none());
    }

    #[test]
    fn bare_extension_names_never_match() {
        assert!(run("payslip", &[".pdf", ".PDF"]).is_none());

        let found = run("payslip", &[".pdf", "payslip-march.pdf"]).unwrap();
        assert_eq!(found.file.name, "payslip-march.pdf");

        assert!(run(".pdf", &["notes.txt"]).is_none());
    }
}
