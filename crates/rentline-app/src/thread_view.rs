//! Headless view model for a message thread.
//!
//! Turns the session's message snapshot into render rows (alignment, time
//! label, day separator) and tracks scroll-to-end requests.  Scrolling is
//! requested from three independent triggers — content-size change,
//! initial layout settling, keyboard becoming visible — because rendering
//! surfaces do not guarantee that a scroll-to-end issued from a single
//! trigger lands after asynchronous layout completes.

use chrono::{Datelike, Days, NaiveDate};
use rentline_shared::PartyId;
use rentline_store::Message;
use serde::Serialize;

/// Which side of the screen a row sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Authored by the current party: right-aligned, distinct color.
    Own,
    /// Authored by the peer: left-aligned.
    Peer,
}

/// One rendered thread entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadRow {
    pub message: Message,
    pub alignment: Alignment,
    /// Time of day, e.g. `14:05`.
    pub time_label: String,
    /// Day separator shown above this row, when its date differs from the
    /// previous row's.
    pub date_label: Option<String>,
}

/// Why a scroll-to-end was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollTrigger {
    ContentSizeChanged,
    InitialLayoutSettled,
    KeyboardShown,
}

/// A pending scroll-to-end request for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRequest {
    pub trigger: ScrollTrigger,
    /// Index of the row to land on (always the newest entry).
    pub target: usize,
}

/// View model for one thread screen.
#[derive(Debug)]
pub struct ThreadViewModel {
    me: PartyId,
    rows: Vec<ThreadRow>,
    pending_scrolls: Vec<ScrollRequest>,
}

impl ThreadViewModel {
    pub fn new(me: PartyId) -> Self {
        Self {
            me,
            rows: Vec::new(),
            pending_scrolls: Vec::new(),
        }
    }

    /// Rebuild rows from a fresh message snapshot.  `today` is the
    /// device-local date used for "Today"/"Yesterday" separators.  A
    /// changed row count counts as a content-size change and requests a
    /// scroll.
    pub fn set_messages(&mut self, messages: Vec<Message>, today: NaiveDate) {
        let previous_len = self.rows.len();

        let mut rows = Vec::with_capacity(messages.len());
        let mut prev_date: Option<NaiveDate> = None;
        for message in messages {
            let date = message.created_at.date_naive();
            let date_label = if prev_date != Some(date) {
                Some(date_label(date, today))
            } else {
                None
            };
            prev_date = Some(date);

            let alignment = if message.author_id == self.me {
                Alignment::Own
            } else {
                Alignment::Peer
            };
            let time_label = message.created_at.format("%H:%M").to_string();

            rows.push(ThreadRow {
                message,
                alignment,
                time_label,
                date_label,
            });
        }
        self.rows = rows;

        if self.rows.len() != previous_len {
            self.request_scroll(ScrollTrigger::ContentSizeChanged);
        }
    }

    /// Called a short delay after the list's first layout.
    pub fn notify_initial_layout(&mut self) {
        self.request_scroll(ScrollTrigger::InitialLayoutSettled);
    }

    /// Called when the on-screen keyboard becomes visible.
    pub fn notify_keyboard_shown(&mut self) {
        self.request_scroll(ScrollTrigger::KeyboardShown);
    }

    fn request_scroll(&mut self, trigger: ScrollTrigger) {
        if let Some(last) = self.rows.len().checked_sub(1) {
            self.pending_scrolls.push(ScrollRequest {
                trigger,
                target: last,
            });
        }
    }

    pub fn rows(&self) -> &[ThreadRow] {
        &self.rows
    }

    /// Drain the pending scroll-to-end requests for the rendering surface.
    pub fn take_scroll_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.pending_scrolls)
    }
}

fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if Some(date) == today.checked_sub_days(Days::new(1)) {
        "Yesterday".to_string()
    } else {
        format!("{}/{}/{}", date.month(), date.day(), date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn message(author: PartyId, recipient: PartyId, text: &str, at: DateTime<Utc>, seq: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            author_id: author,
            recipient_id: recipient,
            content: text.into(),
            attachment_url: None,
            created_at: at,
            seq,
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn own_messages_align_right_peer_left() {
        let me = PartyId::new();
        let peer = PartyId::new();
        let mut vm = ThreadViewModel::new(me);
        vm.set_messages(
            vec![
                message(peer, me, "hi", at(2026, 8, 29, 9, 0), 1),
                message(me, peer, "hello", at(2026, 8, 29, 9, 1), 2),
            ],
            NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
        );

        assert_eq!(vm.rows()[0].alignment, Alignment::Peer);
        assert_eq!(vm.rows()[1].alignment, Alignment::Own);
        assert_eq!(vm.rows()[1].time_label, "09:01");
    }

    #[test]
    fn date_separators_mark_day_boundaries() {
        let me = PartyId::new();
        let peer = PartyId::new();
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut vm = ThreadViewModel::new(me);
        vm.set_messages(
            vec![
                message(me, peer, "a", at(2026, 8, 27, 10, 0), 1),
                message(peer, me, "b", at(2026, 8, 28, 10, 0), 2),
                message(me, peer, "c", at(2026, 8, 29, 10, 0), 3),
                message(peer, me, "d", at(2026, 8, 29, 11, 0), 4),
            ],
            today,
        );

        let labels: Vec<_> = vm.rows().iter().map(|r| r.date_label.clone()).collect();
        assert_eq!(
            labels,
            vec![
                Some("8/27/2026".to_string()),
                Some("Yesterday".to_string()),
                Some("Today".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn three_triggers_each_request_a_scroll_to_end() {
        let me = PartyId::new();
        let peer = PartyId::new();
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut vm = ThreadViewModel::new(me);
        vm.set_messages(
            vec![message(me, peer, "a", at(2026, 8, 29, 10, 0), 1)],
            today,
        );
        vm.notify_initial_layout();
        vm.notify_keyboard_shown();

        let requests = vm.take_scroll_requests();
        let triggers: Vec<_> = requests.iter().map(|r| r.trigger).collect();
        assert_eq!(
            triggers,
            vec![
                ScrollTrigger::ContentSizeChanged,
                ScrollTrigger::InitialLayoutSettled,
                ScrollTrigger::KeyboardShown,
            ]
        );
        assert!(requests.iter().all(|r| r.target == 0));
        // Drained.
        assert!(vm.take_scroll_requests().is_empty());
    }

    #[test]
    fn empty_thread_never_requests_scrolling() {
        let mut vm = ThreadViewModel::new(PartyId::new());
        vm.notify_initial_layout();
        vm.notify_keyboard_shown();
        assert!(vm.take_scroll_requests().is_empty());
    }
}
