// ── Synthetic key sequences ───────────────────────────────────────────────────
//
// Ease of Access is poked by synthesising Windows+U.  Any Shift/Ctrl/Alt the
// user is holding would turn that into a different shortcut, so those are
// released first.  Building the sequence is pure; only `InputSink::send`
// touches the OS.

use std::cell::RefCell;

use crate::error::{RegistrarError, Result};

// ── Virtual-key codes ─────────────────────────────────────────────────────────

pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
/// Alt.
pub const VK_MENU: u16 = 0x12;
pub const VK_LWIN: u16 = 0x5B;
pub const VK_U: u16 = 0x55;

/// Modifiers checked, in order, before the shortcut is sent.
pub const MODIFIERS: [u16; 3] = [VK_SHIFT, VK_CONTROL, VK_MENU];

/// The Ease of Access shortcut, in press order.
pub const EASE_OF_ACCESS_SHORTCUT: [u16; 2] = [VK_LWIN, VK_U];

// ── Events ────────────────────────────────────────────────────────────────────

/// One keyboard event in an injection batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub vk: u16,
    pub key_up: bool,
}

impl KeyEvent {
    pub fn down(vk: u16) -> Self {
        Self { vk, key_up: false }
    }

    pub fn up(vk: u16) -> Self {
        Self { vk, key_up: true }
    }
}

/// Keyboard state and injection, as provided by the OS.
pub trait InputSink {
    /// Whether `vk` is physically held right now.
    fn is_key_down(&self, vk: u16) -> bool;

    /// Inject `events` as one uninterruptible batch.
    fn send(&self, events: &[KeyEvent]) -> Result<()>;
}

// ── Sequence construction ─────────────────────────────────────────────────────

/// Build the batch that presses the shortcut cleanly.
///
/// Phase one releases every held modifier and presses the shortcut keys in
/// order.  Phase two walks the same keys backwards and releases only the
/// shortcut keys.  Held modifiers are not pressed again, so they stay
/// released once the batch has run.
pub fn shortcut_sequence(held_modifiers: &[u16]) -> Vec<KeyEvent> {
    // (vk, desired)
    let keys: Vec<(u16, bool)> = held_modifiers
        .iter()
        .map(|&vk| (vk, false))
        .chain(EASE_OF_ACCESS_SHORTCUT.iter().map(|&vk| (vk, true)))
        .collect();

    let press = keys.iter().map(|&(vk, desired)| {
        if desired {
            KeyEvent::down(vk)
        } else {
            KeyEvent::up(vk)
        }
    });
    let release = keys
        .iter()
        .rev()
        .filter(|&&(_, desired)| desired)
        .map(|&(vk, _)| KeyEvent::up(vk));

    press.chain(release).collect()
}

/// Query `sink` for held modifiers and build the shortcut batch.
pub fn ease_of_access_sequence(sink: &impl InputSink) -> Vec<KeyEvent> {
    let held: Vec<u16> = MODIFIERS
        .iter()
        .copied()
        .filter(|&vk| sink.is_key_down(vk))
        .collect();
    shortcut_sequence(&held)
}

// ── Recording double ──────────────────────────────────────────────────────────

/// `InputSink` that records batches instead of injecting them.
#[derive(Debug, Default)]
pub struct RecordingInput {
    held: Vec<u16>,
    /// Win32 error code every `send` fails with, if set.
    fail_code: Option<u32>,
    queries: RefCell<usize>,
    batches: RefCell<Vec<Vec<KeyEvent>>>,
}

impl RecordingInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `held` keys as pressed.
    pub fn holding(held: &[u16]) -> Self {
        Self {
            held: held.to_vec(),
            ..Self::default()
        }
    }

    /// Reject every batch the way a blocked `SendInput` does
    /// (`ERROR_ACCESS_DENIED`).
    pub fn failing() -> Self {
        Self {
            fail_code: Some(5),
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<KeyEvent>> {
        self.batches.borrow().clone()
    }

    /// Key-state queries plus injected batches.
    pub fn calls(&self) -> usize {
        *self.queries.borrow() + self.batches.borrow().len()
    }
}

impl InputSink for RecordingInput {
    fn is_key_down(&self, vk: u16) -> bool {
        *self.queries.borrow_mut() += 1;
        self.held.contains(&vk)
    }

    fn send(&self, events: &[KeyEvent]) -> Result<()> {
        if let Some(code) = self.fail_code {
            return Err(RegistrarError::Win32 {
                function: "SendInput",
                code,
            });
        }
        self.batches.borrow_mut().push(events.to_vec());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_modifiers_gives_two_downs_then_two_ups() {
        assert_eq!(
            shortcut_sequence(&[]),
            [
                KeyEvent::down(VK_LWIN),
                KeyEvent::down(VK_U),
                KeyEvent::up(VK_U),
                KeyEvent::up(VK_LWIN),
            ]
        );
    }

    #[test]
    fn held_modifiers_are_released_first() {
        let seq = shortcut_sequence(&[VK_SHIFT, VK_MENU]);
        assert_eq!(
            seq,
            [
                KeyEvent::up(VK_SHIFT),
                KeyEvent::up(VK_MENU),
                KeyEvent::down(VK_LWIN),
                KeyEvent::down(VK_U),
                KeyEvent::up(VK_U),
                KeyEvent::up(VK_LWIN),
            ]
        );
    }

    /// Held modifiers are left released after the batch; nothing presses
    /// them again.
    #[test]
    fn held_modifiers_are_not_restored() {
        let seq = shortcut_sequence(&[VK_CONTROL]);
        assert!(!seq.contains(&KeyEvent::down(VK_CONTROL)));
        assert_eq!(seq.iter().filter(|e| e.vk == VK_CONTROL).count(), 1);
    }

    #[test]
    fn every_pressed_key_is_released() {
        let seq = shortcut_sequence(&MODIFIERS);
        for vk in EASE_OF_ACCESS_SHORTCUT {
            let downs = seq.iter().filter(|e| **e == KeyEvent::down(vk)).count();
            let ups = seq.iter().filter(|e| **e == KeyEvent::up(vk)).count();
            assert_eq!((downs, ups), (1, 1));
        }
    }

    #[test]
    fn failing_sink_rejects_and_records_nothing() {
        let sink = RecordingInput::failing();
        let err = sink.send(&shortcut_sequence(&[])).expect_err("blocked");
        assert!(matches!(
            err,
            RegistrarError::Win32 {
                function: "SendInput",
                code: 5
            }
        ));
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn sequence_queries_modifiers_in_order() {
        let sink = RecordingInput::holding(&[VK_MENU, VK_SHIFT]);
        let seq = ease_of_access_sequence(&sink);
        assert_eq!(seq[0], KeyEvent::up(VK_SHIFT));
        assert_eq!(seq[1], KeyEvent::up(VK_MENU));
        assert_eq!(sink.calls(), MODIFIERS.len());
    }
}
