use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use std::fmt::Display;
use std::io::stdout;

/// Writes session output to stdout.
///
/// The session is strictly synchronous (nothing prints while the editor waits
/// for input), so this is a thin seam kept for hooks and views that should not
/// care where their text goes.
#[derive(Default)]
pub struct Printer {}

impl Printer {
    pub fn print(&self, msg: impl Display) {
        print!("{msg}");
    }

    pub fn println(&self, msg: impl Display) {
        println!("{msg}");
    }

    pub fn clear_screen(&self) {
        _ = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }
}

pub mod style {
    use crate::ui::config;
    use crossterm::style::{Color, Stylize};
    use std::fmt::{Display, Formatter};

    const UNKNOWN_PLACEHOLDER: &str = "???";

    struct View<T: Display> {
        inner: Option<T>,
        color: Color,
    }

    impl<T: Display> Display for View<T> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            let text = self
                .inner
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());

            if config::colors_enabled() {
                f.write_fmt(format_args!("{}", text.with(self.color)))
            } else {
                f.write_str(&text)
            }
        }
    }

    /// Construct structure declaration to display data of the same type
    /// (borders, addresses, annotations, etc.).
    macro_rules! view_struct {
        ($name: ident, $color: expr) => {
            pub struct $name<T: Display>(View<T>);

            impl<T: Display> From<T> for $name<T> {
                fn from(value: T) -> Self {
                    Self(View {
                        inner: Some(value),
                        color: $color,
                    })
                }
            }

            impl<T: Display> From<Option<T>> for $name<T> {
                fn from(value: Option<T>) -> Self {
                    Self(View {
                        inner: value,
                        color: $color,
                    })
                }
            }

            impl<T: Display> Display for $name<T> {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    self.0.fmt(f)
                }
            }
        };
    }

    view_struct!(BorderView, Color::Cyan);
    view_struct!(AddressView, Color::Red);
    view_struct!(RegisterNameView, Color::Red);
    view_struct!(ChangedValueView, Color::White);
    view_struct!(CurrentInsnView, Color::Green);
    view_struct!(AnnotationView, Color::Yellow);
    view_struct!(KeywordView, Color::Magenta);
    view_struct!(ErrorView, Color::Red);
}
