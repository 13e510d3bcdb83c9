/// Caller-chosen identifier attached to a registration.
///
/// A `Token` is stored with a registration made through
/// [`Selector::add_with`] and handed back, wrapped in
/// [`Ident::Token`], when that source is reported ready. The value is
/// opaque to the selector; it only has to mean something to the caller.
///
/// [`Selector::add_with`]: crate::Selector::add_with
/// [`Ident::Token`]: crate::Ident::Token
///
/// # Examples
///
/// ```
/// use evmux::{EventKind, Ident, Selector, Semaphore, Token};
///
/// # fn main() -> evmux::Result<()> {
/// let sem = Semaphore::nonblocking()?;
/// let mut selector = Selector::new()?;
///
/// selector.add_with(&sem, EventKind::INPUT, Token(7))?;
/// sem.signal()?;
///
/// selector.wait(None)?;
/// assert_eq!(selector.ready(), Some(Ident::Token(Token(7))));
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub usize);

impl From<Token> for usize {
    fn from(val: Token) -> usize {
        val.0
    }
}
