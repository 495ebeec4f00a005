/// Declares a group of command line flags once and generates two structs from it:
/// `<Name>Cli`, to be flattened into a clap parser, and `<Name>Args`, the plain value the
/// library works with. `<Name>Args` gets a `Default` from the declared defaults, a getter
/// per field and a `with_<field>` builder method per field.
#[macro_export]
macro_rules! args {
    ($(#$argsmeta:tt)* $name:ident {
        $($fhelp:literal $fname:ident: $ftype:ty = $fdefault:expr;)*
    }) => {
        $crate::bin_common::args::args_helper::paste! {
            #[derive(clap::Args, Debug, Clone)]
            pub struct [<$name Cli>] {
                $(
                    #[arg(long, default_value_t = ($fdefault), help = $fhelp)]
                    $fname: $ftype,
                )*
            }

            $(#$argsmeta)*
            pub struct [<$name Args>] {
                $(
                    $fname: $ftype,
                )*
            }

            impl std::default::Default for [<$name Args>] {
                fn default() -> Self {
                    Self {
                        $(
                            $fname: $fdefault,
                        )*
                    }
                }
            }

            impl [<$name Args>] {
                $(
                    pub fn [<with_ $fname>](mut self, $fname: $ftype) -> Self {
                        self.$fname = $fname;
                        self
                    }

                    pub fn $fname(&self) -> $ftype {
                        self.$fname.clone()
                    }
                )*
            }

            impl [<$name Cli>] {
                pub fn to_args(&self) -> [<$name Args>] {
                    [<$name Args>] {
                        $(
                            $fname: self.$fname.clone(),
                        )*
                    }
                }
            }
        }
    };
}

pub use args;
pub use paste::paste;
