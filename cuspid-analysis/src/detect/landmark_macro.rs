macro_rules! define_landmarks {
    ($($name: ident => $label: literal, )*) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Landmark {
            $(
                $name,
            )*
        }

        impl Landmark {
            /// Every landmark, in the detector's default index order.
            pub const ALL: &'static [Landmark] = &[
                $(
                    Landmark::$name,
                )*
            ];

            pub const COUNT: usize = Self::ALL.len();

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Landmark::$name => $label,
                    )*
                }
            }

            pub fn index(&self) -> usize {
                *self as usize
            }
        }

        impl std::str::FromStr for Landmark {
            type Err = AnalysisError;

            fn from_str(label: &str) -> Result<Self, Self::Err> {
                match label {
                    $(
                        $label => Ok(Landmark::$name),
                    )*
                    _ => Err(AnalysisError::UnknownLabel(label.to_string())),
                }
            }
        }
    };
}
