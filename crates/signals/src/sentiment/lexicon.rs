//! Lexicon-based polarity and subjectivity scorer.
//!
//! Each known word carries a polarity in [-1, 1] and a subjectivity in
//! [0, 1]. Intensifiers scale the next scored word, and a negation within
//! the preceding few tokens flips the next scored word's polarity and halves
//! it. The text score is the mean over scored words.

use std::collections::HashMap;

use super::{non_blank, SentimentScore, SentimentScorer};

/// (word, polarity, subjectivity)
const WORDS: &[(&str, f64, f64)] = &[
    // Market moves, positive
    ("rally", 0.6, 0.4),
    ("rallies", 0.6, 0.4),
    ("rallied", 0.6, 0.4),
    ("surge", 0.6, 0.4),
    ("surges", 0.6, 0.4),
    ("surged", 0.6, 0.4),
    ("soar", 0.7, 0.5),
    ("soars", 0.7, 0.5),
    ("soared", 0.7, 0.5),
    ("jump", 0.4, 0.3),
    ("jumps", 0.4, 0.3),
    ("jumped", 0.4, 0.3),
    ("gain", 0.4, 0.2),
    ("gains", 0.4, 0.2),
    ("gained", 0.4, 0.2),
    ("rise", 0.3, 0.1),
    ("rises", 0.3, 0.1),
    ("rose", 0.3, 0.1),
    ("climb", 0.3, 0.2),
    ("climbs", 0.3, 0.2),
    ("rebound", 0.4, 0.3),
    ("rebounds", 0.4, 0.3),
    ("recovery", 0.4, 0.3),
    ("record", 0.3, 0.2),
    ("boost", 0.5, 0.4),
    ("boosts", 0.5, 0.4),
    ("upbeat", 0.6, 0.6),
    ("optimism", 0.6, 0.7),
    ("optimistic", 0.6, 0.7),
    ("bullish", 0.7, 0.7),
    ("strong", 0.4, 0.6),
    ("stronger", 0.4, 0.6),
    ("growth", 0.4, 0.3),
    ("profit", 0.4, 0.2),
    ("profits", 0.4, 0.2),
    ("beat", 0.4, 0.3),
    ("beats", 0.4, 0.3),
    ("upgrade", 0.5, 0.3),
    ("deal", 0.2, 0.2),
    ("stimulus", 0.3, 0.3),
    ("hopes", 0.3, 0.6),
    ("hope", 0.3, 0.6),
    // General evaluative, positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("positive", 0.25, 0.55),
    ("success", 0.5, 0.5),
    ("successful", 0.75, 0.95),
    ("confident", 0.5, 0.8),
    ("win", 0.8, 0.4),
    ("wins", 0.8, 0.4),
    ("easing", 0.2, 0.3),
    // Market moves, negative
    ("fall", -0.3, 0.2),
    ("falls", -0.3, 0.2),
    ("fell", -0.3, 0.2),
    ("drop", -0.3, 0.2),
    ("drops", -0.3, 0.2),
    ("dropped", -0.3, 0.2),
    ("slide", -0.4, 0.3),
    ("slides", -0.4, 0.3),
    ("slip", -0.2, 0.2),
    ("slips", -0.2, 0.2),
    ("decline", -0.3, 0.2),
    ("declines", -0.3, 0.2),
    ("tumble", -0.6, 0.5),
    ("tumbles", -0.6, 0.5),
    ("plunge", -0.7, 0.5),
    ("plunges", -0.7, 0.5),
    ("plunged", -0.7, 0.5),
    ("sink", -0.4, 0.3),
    ("sinks", -0.4, 0.3),
    ("slump", -0.6, 0.5),
    ("slumps", -0.6, 0.5),
    ("crash", -0.8, 0.6),
    ("crashes", -0.8, 0.6),
    ("selloff", -0.6, 0.4),
    ("sell-off", -0.6, 0.4),
    ("loss", -0.4, 0.2),
    ("losses", -0.4, 0.2),
    ("bearish", -0.7, 0.7),
    ("weak", -0.4, 0.6),
    ("weaker", -0.4, 0.6),
    ("downgrade", -0.5, 0.3),
    ("recession", -0.6, 0.4),
    ("slowdown", -0.4, 0.3),
    ("default", -0.5, 0.3),
    ("debt", -0.2, 0.2),
    ("layoffs", -0.5, 0.3),
    ("cuts", -0.2, 0.2),
    ("tariffs", -0.3, 0.3),
    ("sanctions", -0.3, 0.3),
    ("lawsuit", -0.4, 0.3),
    ("probe", -0.3, 0.3),
    ("fraud", -0.7, 0.6),
    ("warns", -0.4, 0.4),
    ("warning", -0.4, 0.4),
    ("fears", -0.5, 0.7),
    ("fear", -0.5, 0.7),
    ("worries", -0.4, 0.7),
    ("worry", -0.4, 0.7),
    ("uncertainty", -0.3, 0.6),
    ("volatile", -0.3, 0.5),
    ("volatility", -0.3, 0.5),
    ("crisis", -0.6, 0.5),
    ("pandemic", -0.4, 0.3),
    ("outbreak", -0.4, 0.3),
    ("virus", -0.3, 0.2),
    // General evaluative, negative
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("negative", -0.3, 0.7),
    ("poor", -0.4, 0.6),
    ("fail", -0.5, 0.3),
    ("fails", -0.5, 0.3),
    ("failed", -0.5, 0.3),
    ("risk", -0.2, 0.4),
    ("risks", -0.2, 0.4),
    ("threat", -0.4, 0.4),
    ("threatens", -0.4, 0.4),
];

/// (word, multiplier)
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("sharply", 1.4),
    ("sharp", 1.3),
    ("steep", 1.3),
    ("deeply", 1.3),
    ("biggest", 1.4),
    ("slightly", 0.5),
    ("modest", 0.6),
    ("modestly", 0.6),
    ("mildly", 0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "without", "nor", "isn't", "aren't", "wasn't", "weren't", "don't",
    "doesn't", "didn't", "won't", "can't", "cannot", "hardly",
];

/// Negation reach, in tokens.
const NEGATION_WINDOW: usize = 3;

/// Polarity multiplier applied to a negated word.
const NEGATION_FACTOR: f64 = -0.5;

/// Word-lexicon polarity and subjectivity scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
}

impl LexiconScorer {
    /// Creates a scorer with the built-in financial news lexicon.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().map(|&(w, p, s)| (w, (p, s))).collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Returns `(polarity, subjectivity)`, both zero when nothing scores.
    #[must_use]
    pub fn analyze(&self, text: &str) -> (f64, f64) {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut scored = 0usize;

        let mut multiplier = 1.0;
        let mut tokens_since_negation: Option<usize> = None;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                tokens_since_negation = Some(0);
                continue;
            }

            if let Some(&m) = self.intensifiers.get(token.as_str()) {
                multiplier = m;
                continue;
            }

            if let Some(&(polarity, subjectivity)) = self.words.get(token.as_str()) {
                let mut p = polarity * multiplier;
                if tokens_since_negation.is_some() {
                    p *= NEGATION_FACTOR;
                    tokens_since_negation = None;
                }
                polarity_sum += p.clamp(-1.0, 1.0);
                subjectivity_sum += (subjectivity * multiplier).clamp(0.0, 1.0);
                scored += 1;
                multiplier = 1.0;
                continue;
            }

            if let Some(n) = tokens_since_negation.as_mut() {
                *n += 1;
                if *n >= NEGATION_WINDOW {
                    tokens_since_negation = None;
                }
            }
        }

        if scored == 0 {
            return (0.0, 0.0);
        }

        let n = scored as f64;
        (
            (polarity_sum / n).clamp(-1.0, 1.0),
            (subjectivity_sum / n).clamp(0.0, 1.0),
        )
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn dimensions(&self) -> &'static [&'static str] {
        &["polarity", "subjectivity"]
    }

    fn score(&self, text: Option<&str>) -> SentimentScore {
        let (polarity, subjectivity) = non_blank(text).map_or((0.0, 0.0), |t| self.analyze(t));
        SentimentScore::PolaritySubjectivity {
            polarity,
            subjectivity,
        }
    }
}

/// Lowercased word tokens; apostrophes and inner hyphens stay attached.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}' || c == '-'))
        .map(|t| {
            t.trim_matches(|c| c == '\'' || c == '\u{2019}' || c == '-')
                .replace('\u{2019}', "'")
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarity(text: &str) -> f64 {
        LexiconScorer::new().analyze(text).0
    }

    #[test]
    fn tokenize_keeps_contractions_and_hyphens() {
        assert_eq!(
            tokenize("Stocks DON'T sell-off -- Fed’s \"easing\"!"),
            vec!["stocks", "don't", "sell-off", "fed's", "easing"]
        );
    }

    #[test]
    fn positive_and_negative_headlines() {
        assert!(polarity("Wall Street rallies as tech shares surge") > 0.0);
        assert!(polarity("Oil prices plunge on recession fears") < 0.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        assert_eq!(
            LexiconScorer::new().analyze("Central bank meets on Tuesday"),
            (0.0, 0.0)
        );
    }

    #[test]
    fn scores_are_mean_of_scored_words() {
        // rally (0.6, 0.4) and fall (-0.3, 0.2)
        let (p, s) = LexiconScorer::new().analyze("rally then fall");
        assert!((p - 0.15).abs() < 1e-12);
        assert!((s - 0.3).abs() < 1e-12);
    }

    #[test]
    fn negation_flips_and_dampens() {
        // good = 0.7 -> not good = -0.35
        assert!((polarity("not good") + 0.35).abs() < 1e-12);
    }

    #[test]
    fn negation_expires_after_window() {
        // three neutral tokens between negation and the scored word
        assert!((polarity("not that the market good") - 0.7).abs() < 1e-12);
        assert!((polarity("not the market good") + 0.35).abs() < 1e-12);
    }

    #[test]
    fn intensifier_scales_next_word_only() {
        // very good = 0.91, then bad = -0.7
        let (p, _) = LexiconScorer::new().analyze("very good bad");
        assert!((p - (0.91 - 0.7) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn bounds_hold() {
        let scorer = LexiconScorer::new();
        for text in [
            "extremely best best best",
            "extremely worst crash crash",
            "very very subjective worst fears",
        ] {
            let (p, s) = scorer.analyze(text);
            assert!((-1.0..=1.0).contains(&p), "{text}: {p}");
            assert!((0.0..=1.0).contains(&s), "{text}: {s}");
        }
    }

    #[test]
    fn scoring_is_idempotent() {
        let scorer = LexiconScorer::new();
        let text = Some("Stocks slide as virus worries hit travel shares, not a recovery");
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn custom_word_overrides_lexicon() {
        let mut scorer = LexiconScorer::new();
        scorer.words.insert("dovish", (0.4, 0.5));
        assert_eq!(scorer.analyze("dovish"), (0.4, 0.5));
    }
}
