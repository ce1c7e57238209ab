use super::action::Action;
use super::action::ActionKind;

/// the canonical single-letter encoding of a street's action history,
/// e.g. `X-B-R`. shared verbatim with the indexing side: both the
/// exact-match retrieval filter and the river in-shard search compare
/// these strings for equality.
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ActionSequence(String);

impl ActionSequence {
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split('-').count()
        }
    }
    /// from raw solver tokens, e.g. the `actionHistory` of a shard node
    pub fn parse_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        tokens
            .iter()
            .map(|t| Action::parse_token(t.as_ref()))
            .collect()
    }
}

impl FromIterator<Action> for ActionSequence {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|a| a.kind().letter().to_string())
                .collect::<Vec<_>>()
                .join("-"),
        )
    }
}
impl From<&[Action]> for ActionSequence {
    fn from(actions: &[Action]) -> Self {
        actions.iter().copied().collect()
    }
}
impl FromIterator<ActionKind> for ActionSequence {
    fn from_iter<I: IntoIterator<Item = ActionKind>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|k| k.letter().to_string())
                .collect::<Vec<_>>()
                .join("-"),
        )
    }
}

impl std::fmt::Display for ActionSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_letters() {
        let actions = vec![
            Action::Check,
            Action::Bet {
                amount: 5.0,
                amount_bb: None,
            },
            Action::Raise {
                amount: 15.0,
                amount_bb: None,
            },
            Action::Call,
        ];
        let sequence = ActionSequence::from(actions.as_slice());
        assert_eq!(sequence.as_str(), "X-B-R-C");
        assert_eq!(sequence.len(), 4);
    }

    #[test]
    fn parses_tokens() {
        let sequence = ActionSequence::parse_tokens(&["check", "bet 10", "???"]);
        assert_eq!(sequence.as_str(), "X-B-U");
    }

    #[test]
    fn determinism() {
        let tokens = ["x", "bet 3", "raise 9", "call"];
        assert_eq!(
            ActionSequence::parse_tokens(&tokens),
            ActionSequence::parse_tokens(&tokens),
        );
    }
}
