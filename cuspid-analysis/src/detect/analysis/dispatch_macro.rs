macro_rules! define_describer {
    ($($name: ident => $to: ident, )*) => {
        #[derive(Debug, Copy, Clone)]
        pub enum DescriberDispatcher {
            $(
                $name($to),
            )*
        }

        impl Describer for DescriberDispatcher {
            fn describe(&self, data: &AnnotationData<'_>) -> Option<Annotation> {
                match self {
                    $(
                        DescriberDispatcher::$name(describer) => describer.describe(data),
                    )*
                }
            }
        }

        impl DescriberDispatcher {
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
