//! Fixtures - named bundles of test behaviors
//!
//! A fixture registers its behaviors explicitly through [`Fixture::behaviors`];
//! the [`behaviors!`](crate::behaviors) macro builds that list from method names.

/// A zero-argument test behavior bound to a fixture instance
pub type Behavior<F> = fn(&mut F) -> anyhow::Result<()>;

/// A bundle of behaviors sharing one `set_up`/`tear_down` pair.
///
/// Each test case gets its own instance, built with [`Default`].
pub trait Fixture: Default + 'static {
    /// Every behavior this fixture declares, as `(name, behavior)` pairs.
    ///
    /// Order does not matter; discovery sorts by name.
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)>;

    /// Runs before each behavior
    fn set_up(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs after each behavior, whatever its outcome
    fn tear_down(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Name used in logs and lookup errors
    fn fixture_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Build a [`Fixture::behaviors`] list from method names.
///
/// ```
/// use xunit_core::{behaviors, Behavior, Fixture};
///
/// #[derive(Default)]
/// struct Sample;
///
/// impl Sample {
///     fn test_one(&mut self) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
///
/// impl Fixture for Sample {
///     fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
///         behaviors![Self => test_one]
///     }
/// }
///
/// assert_eq!(Sample::behaviors()[0].0, "test_one");
/// ```
#[macro_export]
macro_rules! behaviors {
    ($fixture:ty => $($name:ident),* $(,)?) => {
        ::std::vec![$(
            (
                ::std::stringify!($name),
                <$fixture>::$name as $crate::Behavior<$fixture>,
            )
        ),*]
    };
}
