use rand::seq::SliceRandom;
use rand::Rng;

/// Intent bucket a user message falls into. The assistant is a scripted
/// keyword matcher, not a language model; each bucket has a small pool of
/// canned replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Greeting,
    Issue,
    Confirmation,
    Form,
    Thanks,
    Fallback,
}

const GREETING_KEYWORDS: &[&str] = &["hello", "hi", "hey"];
const ISSUE_KEYWORDS: &[&str] = &["issue", "problem", "broken"];
const CONFIRMATION_KEYWORDS: &[&str] = &["yes", "sure", "ok"];
const FORM_KEYWORDS: &[&str] = &["form", "submit"];
const THANKS_KEYWORDS: &[&str] = &["thanks", "thank you"];

// Checked in this exact order; the first bucket with a keyword hit wins.
// A message like "hi, my printer is broken" is a greeting, not an issue.
const KEYWORD_BUCKETS: &[(Category, &[&str])] = &[
    (Category::Greeting, GREETING_KEYWORDS),
    (Category::Issue, ISSUE_KEYWORDS),
    (Category::Confirmation, CONFIRMATION_KEYWORDS),
    (Category::Form, FORM_KEYWORDS),
    (Category::Thanks, THANKS_KEYWORDS),
];

impl Category {
    /// Categories that move the conversation into the incident form.
    pub fn opens_form(self) -> bool {
        matches!(self, Category::Confirmation | Category::Form)
    }

    fn pool(self) -> &'static [&'static str] {
        match self {
            Category::Greeting => &[
                "Hello! I'm here to help with your IT issues. Would you like to submit a new incident?",
                "Hi there! Need help with an IT problem? I can assist you with that.",
            ],
            Category::Issue => &[
                "I understand you're experiencing an issue. Let's get that resolved. Would you like to submit a formal incident report?",
                "Sorry to hear you're having problems. I can help you submit an IT support request.",
            ],
            Category::Confirmation => &[
                "Great! I'll guide you through the incident submission process.",
                "Perfect! Let's get your IT issue documented and resolved.",
            ],
            Category::Form => &[
                "Please fill out the incident form with all the necessary details.",
                "I'll need some information to properly route your IT issue to the right team.",
            ],
            Category::Thanks => &[
                "You're welcome! Your IT issue has been submitted. The IT team will be in touch soon.",
                "Happy to help! Your incident has been logged and our IT team will work on it promptly.",
            ],
            Category::Fallback => &[
                "I'm not sure I understand. Would you like to submit an IT support incident?",
                "I'm here to help with IT issues. Would you like to report a problem?",
            ],
        }
    }
}

/// Maps free text to a category by substring keyword matching.
pub fn classify(text: &str) -> Category {
    let lower = text.to_lowercase();
    for (category, keywords) in KEYWORD_BUCKETS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *category;
        }
    }
    Category::Fallback
}

/// Uniform-random pick from the category's reply pool. The RNG is injected
/// so callers (and tests) control determinism.
pub fn select_response<R: Rng + ?Sized>(category: Category, rng: &mut R) -> &'static str {
    category.pool().choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn greeting_keywords_classify_as_greeting() {
        assert_eq!(classify("hello there"), Category::Greeting);
        assert_eq!(classify("Hey!"), Category::Greeting);
        assert_eq!(classify("HI"), Category::Greeting);
    }

    #[test]
    fn issue_keywords_classify_as_issue() {
        assert_eq!(classify("my printer is broken"), Category::Issue);
        assert_eq!(classify("I have a problem"), Category::Issue);
    }

    #[test]
    fn greeting_wins_over_issue_in_mixed_input() {
        // Ordered match: greeting is checked before issue.
        assert_eq!(classify("hi, my printer is broken"), Category::Greeting);
    }

    #[test]
    fn confirmation_form_and_thanks() {
        assert_eq!(classify("yes please"), Category::Confirmation);
        assert_eq!(classify("sure"), Category::Confirmation);
        assert_eq!(classify("give me the form"), Category::Form);
        assert_eq!(classify("I want to submit something"), Category::Form);
        assert_eq!(classify("thanks a lot"), Category::Thanks);
        assert_eq!(classify("thank you"), Category::Thanks);
    }

    #[test]
    fn unmatched_input_falls_back() {
        assert_eq!(classify("the weather is nice"), Category::Fallback);
        assert_eq!(classify(""), Category::Fallback);
    }

    #[test]
    fn only_confirmation_and_form_open_the_form() {
        assert!(Category::Confirmation.opens_form());
        assert!(Category::Form.opens_form());
        assert!(!Category::Greeting.opens_form());
        assert!(!Category::Issue.opens_form());
        assert!(!Category::Thanks.opens_form());
        assert!(!Category::Fallback.opens_form());
    }

    #[test]
    fn selected_response_stays_within_the_category_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let categories = [
            Category::Greeting,
            Category::Issue,
            Category::Confirmation,
            Category::Form,
            Category::Thanks,
            Category::Fallback,
        ];
        for category in categories {
            for _ in 0..20 {
                let line = select_response(category, &mut rng);
                assert!(
                    category.pool().contains(&line),
                    "line {line:?} not in pool for {category:?}"
                );
            }
        }
    }

    #[test]
    fn every_pool_has_two_lines() {
        for (category, _) in KEYWORD_BUCKETS {
            assert_eq!(category.pool().len(), 2);
        }
        assert_eq!(Category::Fallback.pool().len(), 2);
    }
}
