use std::{fmt, ops};

/// A set of event kinds.
///
/// `EventKind` plays two roles: as the interest mask handed to
/// [`Selector::add`], naming the kinds of readiness the caller wants to be
/// woken for, and as the observed set stored after a [`Selector::wait`],
/// naming the kinds that were actually asserted. More than one kind may be
/// asserted for a single readiness event, and the observed set may be empty
/// (nothing was ready before the timeout).
///
/// Sets are combined with the bitwise operators.
///
/// [`Selector::add`]: crate::Selector::add
/// [`Selector::wait`]: crate::Selector::wait
///
/// # Examples
///
/// ```
/// use evmux::EventKind;
///
/// let interest = EventKind::INPUT | EventKind::PRIORITY_INPUT;
///
/// assert!(interest.is_input());
/// assert!(interest.is_priority_input());
/// assert!(!interest.is_output());
/// ```
#[derive(Copy, PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct EventKind(usize);

// These must be unique.
const INPUT: usize = 0b00001;
const OUTPUT: usize = 0b00010;
const ERROR: usize = 0b00100;
const HANGUP: usize = 0b01000;
const PRIORITY_INPUT: usize = 0b10000;

impl EventKind {
    /// Readable, ready to receive.
    pub const INPUT: EventKind = EventKind(INPUT);

    /// Writable.
    pub const OUTPUT: EventKind = EventKind(OUTPUT);

    /// An error condition on the source.
    pub const ERROR: EventKind = EventKind(ERROR);

    /// The peer closed its end of the source.
    pub const HANGUP: EventKind = EventKind(HANGUP);

    /// Urgent readable data.
    pub const PRIORITY_INPUT: EventKind = EventKind(PRIORITY_INPUT);

    /// Returns the empty `EventKind` set.
    pub const fn empty() -> EventKind {
        EventKind(0)
    }

    /// Returns true if `self` is the empty set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add together two `EventKind` sets.
    ///
    /// This does the same thing as the `BitOr` implementation, but is a
    /// constant function.
    #[allow(clippy::should_implement_trait)]
    pub const fn add(self, other: EventKind) -> EventKind {
        EventKind(self.0 | other.0)
    }

    /// Returns true if `self` is a superset of `other`.
    pub const fn contains(self, other: EventKind) -> bool {
        self.0 & other.0 == other.0
    }

    /// Adds all kinds represented by `other` into `self`.
    pub fn insert(&mut self, other: EventKind) {
        self.0 |= other.0;
    }

    /// Removes all kinds represented by `other` from `self`.
    pub fn remove(&mut self, other: EventKind) {
        self.0 &= !other.0;
    }

    /// Returns true if the value includes input readiness.
    pub const fn is_input(self) -> bool {
        self.0 & INPUT != 0
    }

    /// Returns true if the value includes output readiness.
    pub const fn is_output(self) -> bool {
        self.0 & OUTPUT != 0
    }

    /// Returns true if the value includes an error condition.
    pub const fn is_error(self) -> bool {
        self.0 & ERROR != 0
    }

    /// Returns true if the value includes a hangup.
    pub const fn is_hangup(self) -> bool {
        self.0 & HANGUP != 0
    }

    /// Returns true if the value includes priority input readiness.
    pub const fn is_priority_input(self) -> bool {
        self.0 & PRIORITY_INPUT != 0
    }
}

impl ops::BitOr for EventKind {
    type Output = EventKind;

    #[inline]
    fn bitor(self, other: EventKind) -> EventKind {
        EventKind(self.0 | other.0)
    }
}

impl ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, other: EventKind) {
        self.0 |= other.0;
    }
}

impl ops::BitAnd for EventKind {
    type Output = EventKind;

    #[inline]
    fn bitand(self, other: EventKind) -> EventKind {
        EventKind(self.0 & other.0)
    }
}

impl ops::Sub for EventKind {
    type Output = EventKind;

    #[inline]
    fn sub(self, other: EventKind) -> EventKind {
        EventKind(self.0 & !other.0)
    }
}

impl fmt::Debug for EventKind {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut one = false;
        let flags = [
            (EventKind::INPUT, "INPUT"),
            (EventKind::OUTPUT, "OUTPUT"),
            (EventKind::ERROR, "ERROR"),
            (EventKind::HANGUP, "HANGUP"),
            (EventKind::PRIORITY_INPUT, "PRIORITY_INPUT"),
        ];

        for (flag, name) in flags {
            if self.contains(flag) {
                if one {
                    write!(fmt, " | ")?;
                }
                write!(fmt, "{}", name)?;
                one = true;
            }
        }

        if !one {
            fmt.write_str("(empty)")?;
        }

        Ok(())
    }
}

#[test]
fn test_debug_event_kind() {
    assert_eq!("(empty)", format!("{:?}", EventKind::empty()));
    assert_eq!("INPUT", format!("{:?}", EventKind::INPUT));
    assert_eq!(
        "INPUT | OUTPUT",
        format!("{:?}", EventKind::INPUT | EventKind::OUTPUT)
    );
    assert_eq!("HANGUP", format!("{:?}", EventKind::HANGUP));
}

#[test]
fn test_set_operations() {
    let mut kind = EventKind::INPUT | EventKind::ERROR;
    assert!(kind.contains(EventKind::INPUT));
    assert!(!kind.contains(EventKind::INPUT | EventKind::OUTPUT));
    assert!(!kind.is_empty());

    kind.insert(EventKind::OUTPUT);
    assert!(kind.contains(EventKind::INPUT | EventKind::OUTPUT));

    kind.remove(EventKind::INPUT | EventKind::ERROR);
    assert!(!kind.is_input());
    assert!(!kind.is_error());
    assert!(kind.is_output());
}
