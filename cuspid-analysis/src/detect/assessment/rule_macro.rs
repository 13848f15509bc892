macro_rules! define_rules {
    ($($name: ident => $to: ident, )*) => {
        #[derive(Debug, Copy, Clone)]
        pub enum RuleDispatcher {
            $(
                $name($to),
            )*
        }

        impl AssessmentRule for RuleDispatcher {
            fn assess(&self, input: &AssessmentInput<'_>) -> Option<RuleOutcome> {
                match self {
                    $(
                        RuleDispatcher::$name(rule) => rule.assess(input),
                    )*
                }
            }
        }

        impl RuleDispatcher {
            /// Every rule, in the order they are folded.
            pub fn all() -> Vec<Self> {
                vec![
                    $(
                        Self::$name($to),
                    )*
                ]
            }
        }
    };
}
