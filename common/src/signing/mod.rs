//! Signer journey state machine.
//!
//! Phases only move forward (`Welcome → Preview → Signing → Completed`), except
//! that a signer may go back from `Signing` to `Preview` to read the document
//! again without losing anything. Only zones assigned to the owner role are
//! part of this flow; each of them carries a tagged [`ZoneState`] that becomes
//! read-only the moment it is completed.

mod input;
mod scroll;

pub use input::{format_date, ZoneInput, DATE_FORMAT};
pub use scroll::{ScrollMetrics, SCROLL_TOLERANCE};

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, SigningError};
use crate::model::session::{FinalizedSignature, SessionStatus, SignatureSession, SignatureZoneData};
use crate::model::template::SignatureTemplate;
use crate::model::zone::{SignatureZone, ZoneRole, ZoneType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Welcome,
    Preview,
    Signing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneState {
    Incomplete,
    Completed(String),
}

impl ZoneState {
    pub fn is_completed(&self) -> bool {
        matches!(self, ZoneState::Completed(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            ZoneState::Completed(value) => Some(value.as_str()),
            ZoneState::Incomplete => None,
        }
    }
}

/// Notification and archival collaborator, called once per finalize.
pub trait SignatureArchive {
    fn archive(&mut self, record: &FinalizedSignature) -> Result<(), ArchiveError>;
}

pub struct SigningFlow {
    template: SignatureTemplate,
    session: SignatureSession,
    /// Owner zones in `sort_order`.
    zones: Vec<SignatureZone>,
    /// Parallel to `zones`.
    states: Vec<ZoneState>,
    phase: Phase,
    has_scrolled_to_bottom: bool,
    /// Document page count, once the renderer reported it.
    page_count: Option<u32>,
    /// Pages currently laid out in the preview.
    mounted_pages: u32,
    current_index: usize,
}

impl SigningFlow {
    /// Starts a fresh journey. A session that is already signed opens completed.
    pub fn new(template: SignatureTemplate, session: SignatureSession) -> Self {
        let zones: Vec<SignatureZone> = template.owner_zones().into_iter().cloned().collect();
        let states = vec![ZoneState::Incomplete; zones.len()];
        let phase = if session.is_signed() {
            Phase::Completed
        } else {
            Phase::Welcome
        };
        SigningFlow {
            template,
            session,
            zones,
            states,
            phase,
            has_scrolled_to_bottom: false,
            page_count: None,
            mounted_pages: 0,
            current_index: 0,
        }
    }

    /// Rebuilds a journey for a re-issued session, marking the zones found in
    /// `zone_data` as completed and focusing the first incomplete zone.
    pub fn resume(
        template: SignatureTemplate,
        session: SignatureSession,
        zone_data: Vec<SignatureZoneData>,
    ) -> Result<Self, SigningError> {
        let mut flow = SigningFlow::new(template, session);
        for record in zone_data {
            if record.session_id != flow.session.id {
                return Err(SigningError::ForeignZoneData(record.session_id));
            }
            let index = flow.owner_index(&record.zone_id)?;
            flow.states[index] = ZoneState::Completed(record.value);
        }
        flow.current_index = flow.first_incomplete().unwrap_or(0);
        Ok(flow)
    }

    /// Replays stored zone data on the server and leaves the flow ready to
    /// finalize. The signer's client attests the full-document read.
    pub fn for_submission(
        template: SignatureTemplate,
        session: SignatureSession,
        zone_data: Vec<SignatureZoneData>,
    ) -> Result<Self, SigningError> {
        if session.is_signed() {
            return Err(SigningError::SessionClosed(session.status));
        }
        let mut flow = SigningFlow::resume(template, session, zone_data)?;
        flow.open_document()?;
        flow.has_scrolled_to_bottom = true;
        flow.proceed_to_signing()?;
        Ok(flow)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &SignatureSession {
        &self.session
    }

    pub fn template(&self) -> &SignatureTemplate {
        &self.template
    }

    pub fn owner_zones(&self) -> &[SignatureZone] {
        &self.zones
    }

    pub fn zone_state(&self, index: usize) -> Option<&ZoneState> {
        self.states.get(index)
    }

    pub fn zone_states(&self) -> impl Iterator<Item = (&SignatureZone, &ZoneState)> {
        self.zones.iter().zip(self.states.iter())
    }

    // Phase transitions

    /// Welcome → Preview. Returns `true` when the session just became viewed.
    pub fn open_document(&mut self) -> Result<bool, SigningError> {
        self.expect_phase(Phase::Welcome)?;
        self.phase = Phase::Preview;
        let first_view = self.session.status == SessionStatus::Pending;
        if first_view {
            self.session.status = SessionStatus::Viewed;
        }
        debug!("session {} previewing document", self.session.id);
        Ok(first_view)
    }

    pub fn page_count(&self) -> Option<u32> {
        self.page_count
    }

    /// Page count reported by the renderer.
    pub fn set_page_count(&mut self, count: u32) {
        self.page_count = Some(count.max(1));
    }

    /// Number of pages laid out in the preview when it was last measured.
    pub fn set_mounted_pages(&mut self, mounted: u32) {
        self.mounted_pages = mounted;
    }

    /// Whether the preview holds the whole document, so that its scroll height
    /// is final. A template without document shows one blank page.
    pub fn preview_complete(&self) -> bool {
        match self.template.document_url {
            None => true,
            Some(_) => self.page_count.is_some_and(|count| self.mounted_pages >= count),
        }
    }

    /// Records the preview scroll position. Positions measured before the
    /// preview is complete are ignored. Once the bottom was reached the gate
    /// stays open for the rest of the session.
    pub fn report_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if !self.has_scrolled_to_bottom && self.preview_complete() && metrics.reached_bottom() {
            debug!("session {} read the document to the end", self.session.id);
            self.has_scrolled_to_bottom = true;
        }
        self.has_scrolled_to_bottom
    }

    pub fn has_scrolled_to_bottom(&self) -> bool {
        self.has_scrolled_to_bottom
    }

    pub fn can_proceed(&self) -> bool {
        self.phase == Phase::Preview && self.has_scrolled_to_bottom
    }

    /// Preview → Signing, keeping the focused zone.
    pub fn proceed_to_signing(&mut self) -> Result<(), SigningError> {
        self.expect_phase(Phase::Preview)?;
        if !self.has_scrolled_to_bottom {
            return Err(SigningError::DocumentNotRead);
        }
        self.phase = Phase::Signing;
        Ok(())
    }

    /// Signing → Preview; completed zones are kept.
    pub fn review_document(&mut self) -> Result<(), SigningError> {
        self.expect_phase(Phase::Signing)?;
        self.phase = Phase::Preview;
        Ok(())
    }

    // Zones

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_zone(&self) -> Option<&SignatureZone> {
        self.zones.get(self.current_index)
    }

    /// Focuses any zone, completed ones included (shown read-only).
    pub fn select_zone(&mut self, index: usize) -> bool {
        if index < self.zones.len() {
            self.current_index = index;
            true
        } else {
            false
        }
    }

    pub fn next_zone(&mut self) -> bool {
        self.select_zone(self.current_index + 1)
    }

    pub fn previous_zone(&mut self) -> bool {
        self.current_index > 0 && self.select_zone(self.current_index - 1)
    }

    /// Value offered to the signer before they confirm a text or date zone.
    pub fn default_input(&self, zone_id: &str, today: NaiveDate) -> Option<String> {
        let zone = self.zones.iter().find(|z| z.id == zone_id)?;
        if !zone.zone_type.accepts_field_key() {
            return None;
        }
        if let Some(cached) = self.session.field_values.get(zone_id) {
            return Some(cached.clone());
        }
        let from_key = zone.field_key.as_deref().and_then(|key| match key {
            "today" => Some(format_date(today)),
            key => self.session.field_value(key),
        });
        match (from_key, zone.zone_type) {
            (Some(value), _) => Some(value),
            (None, ZoneType::Date) => Some(format_date(today)),
            (None, _) => None,
        }
    }

    /// Records the signer's value for an owner zone.
    ///
    /// A completed zone is read-only for the rest of the session. Unless it
    /// was the last incomplete zone, focus moves one zone forward.
    pub fn complete_zone(&mut self, zone_id: &str, input: ZoneInput) -> Result<SignatureZoneData, SigningError> {
        self.expect_phase(Phase::Signing)?;
        let index = self.owner_index(zone_id)?;
        if self.states[index].is_completed() {
            return Err(SigningError::ZoneAlreadyCompleted(zone_id.to_string()));
        }
        let zone = &self.zones[index];
        let value = input.into_value(zone)?;
        if zone.zone_type.accepts_field_key() {
            self.session
                .field_values
                .insert(zone_id.to_string(), value.clone());
        }
        self.states[index] = ZoneState::Completed(value.clone());
        debug!(
            "session {} completed zone {zone_id} ({}/{})",
            self.session.id,
            self.completed_count(),
            self.zones.len()
        );
        if self.remaining_count() > 0 && self.current_index + 1 < self.zones.len() {
            self.current_index += 1;
        }
        Ok(SignatureZoneData {
            session_id: self.session.id.clone(),
            zone_id: zone_id.to_string(),
            value,
        })
    }

    pub fn completed_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_completed()).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.zones.len() - self.completed_count()
    }

    /// Completed owner zones as a whole percentage.
    pub fn progress_percent(&self) -> u8 {
        if self.zones.is_empty() {
            return 100;
        }
        let ratio = self.completed_count() as f64 / self.zones.len() as f64;
        (ratio * 100.0).round() as u8
    }

    /// Zone data of every completed zone, in navigation order.
    pub fn zone_data(&self) -> Vec<SignatureZoneData> {
        self.zone_states()
            .filter_map(|(zone, state)| {
                state.value().map(|value| SignatureZoneData {
                    session_id: self.session.id.clone(),
                    zone_id: zone.id.clone(),
                    value: value.to_string(),
                })
            })
            .collect()
    }

    pub fn can_finalize(&self) -> bool {
        self.phase == Phase::Signing && self.remaining_count() == 0
    }

    /// Closes the session and hands the result to `archive`, exactly once.
    ///
    /// If the archive rejects the record nothing changes and the signer can
    /// try again.
    pub fn finalize<A: SignatureArchive>(
        &mut self,
        signed_at: DateTime<Utc>,
        signer_ip: Option<String>,
        archive: &mut A,
    ) -> Result<FinalizedSignature, SigningError> {
        self.expect_phase(Phase::Signing)?;
        let remaining = self.remaining_count();
        if remaining > 0 {
            return Err(SigningError::IncompleteZones { remaining });
        }
        let record = FinalizedSignature {
            session_id: self.session.id.clone(),
            template_id: self.template.id.clone(),
            owner_name: self.session.owner_name.clone(),
            property_address: self.session.property_address.clone(),
            signer_ip: signer_ip.clone(),
            signed_at,
            zone_data: self.zone_data(),
        };
        archive.archive(&record)?;
        self.session.status = SessionStatus::Signed;
        self.session.signed_at = Some(signed_at);
        self.session.signer_ip = signer_ip;
        self.phase = Phase::Completed;
        debug!("session {} signed", self.session.id);
        Ok(record)
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), SigningError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SigningError::WrongPhase(self.phase))
        }
    }

    fn owner_index(&self, zone_id: &str) -> Result<usize, SigningError> {
        if let Some(index) = self.zones.iter().position(|z| z.id == zone_id) {
            return Ok(index);
        }
        match self.template.zone(zone_id) {
            Some(zone) if zone.role != ZoneRole::Owner => Err(SigningError::NotOwnerZone(zone_id.to_string())),
            _ => Err(SigningError::UnknownZone(zone_id.to_string())),
        }
    }

    fn first_incomplete(&self) -> Option<usize> {
        self.states.iter().position(|s| !s.is_completed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::zone::ZoneType;

    struct Recorder(Vec<FinalizedSignature>);

    impl SignatureArchive for Recorder {
        fn archive(&mut self, record: &FinalizedSignature) -> Result<(), ArchiveError> {
            self.0.push(record.clone());
            Ok(())
        }
    }

    struct Offline;

    impl SignatureArchive for Offline {
        fn archive(&mut self, _record: &FinalizedSignature) -> Result<(), ArchiveError> {
            Err(ArchiveError("smtp unreachable".into()))
        }
    }

    fn zone(id: &str, zone_type: ZoneType, role: ZoneRole, sort_order: i64) -> SignatureZone {
        let (width, height) = zone_type.default_size();
        SignatureZone {
            id: id.into(),
            template_id: "tpl".into(),
            zone_type,
            label: id.into(),
            role,
            page_number: 1,
            x_position: 20.0,
            y_position: 20.0,
            width,
            height,
            is_required: true,
            sort_order,
            field_key: None,
        }
    }

    fn flow_with(zones: Vec<SignatureZone>) -> SigningFlow {
        let mut template = SignatureTemplate::new("tpl", "Mandat");
        template.zones = zones;
        SigningFlow::new(template, SignatureSession::new("s1", "tpl", "Claire Martin", "Annecy"))
    }

    fn signed_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_742_036_400, 0).unwrap()
    }

    fn read_to_end(flow: &mut SigningFlow) {
        flow.open_document().unwrap();
        flow.report_scroll(ScrollMetrics {
            scroll_top: 0.0,
            client_height: 900.0,
            scroll_height: 900.0,
        });
        flow.proceed_to_signing().unwrap();
    }

    #[test]
    fn scroll_gate_waits_for_every_page() {
        let mut flow = flow_with(vec![zone("t", ZoneType::Text, ZoneRole::Owner, 1)]);
        flow.template.document_url = Some("/api/documents/mandat.pdf".into());
        flow.open_document().unwrap();
        // One page fits the viewport before the page count is known
        let first_page_only = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 1000.0,
            scroll_height: 954.0,
        };
        flow.set_mounted_pages(1);
        assert!(!flow.report_scroll(first_page_only));

        flow.set_page_count(3);
        assert!(!flow.preview_complete());
        assert!(!flow.report_scroll(first_page_only));
        assert!(!flow.can_proceed());

        flow.set_mounted_pages(3);
        let top = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 1000.0,
            scroll_height: 2862.0,
        };
        assert!(!flow.report_scroll(top));
        assert!(flow.report_scroll(ScrollMetrics {
            scroll_top: 1862.0,
            ..top
        }));
        assert!(flow.can_proceed());
    }

    #[test]
    fn blank_template_preview_is_complete_at_once() {
        let flow = flow_with(vec![zone("t", ZoneType::Text, ZoneRole::Owner, 1)]);
        assert_eq!(flow.page_count(), None);
        assert!(flow.preview_complete());
    }

    #[test]
    fn open_document_marks_session_viewed_once() {
        let mut flow = flow_with(vec![zone("t", ZoneType::Text, ZoneRole::Owner, 1)]);
        assert_eq!(flow.phase(), Phase::Welcome);
        assert_eq!(flow.open_document(), Ok(true));
        assert_eq!(flow.session().status, SessionStatus::Viewed);
        assert_eq!(flow.open_document(), Err(SigningError::WrongPhase(Phase::Preview)));
    }

    #[test]
    fn proceed_requires_full_scroll() {
        let mut flow = flow_with(vec![zone("t", ZoneType::Text, ZoneRole::Owner, 1)]);
        flow.open_document().unwrap();
        let partial = ScrollMetrics {
            scroll_top: 100.0,
            client_height: 500.0,
            scroll_height: 3000.0,
        };
        assert!(!flow.report_scroll(partial));
        assert!(!flow.can_proceed());
        assert_eq!(flow.proceed_to_signing(), Err(SigningError::DocumentNotRead));
        let bottom = ScrollMetrics {
            scroll_top: 2490.0,
            ..partial
        };
        assert!(flow.report_scroll(bottom));
        assert!(flow.report_scroll(partial));
        assert!(flow.can_proceed());
        flow.proceed_to_signing().unwrap();
        assert_eq!(flow.phase(), Phase::Signing);
    }

    #[test]
    fn review_keeps_progress_and_position() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Text, ZoneRole::Owner, 2),
            zone("c", ZoneType::Text, ZoneRole::Owner, 3),
        ]);
        read_to_end(&mut flow);
        flow.complete_zone("a", ZoneInput::Text("oui".into())).unwrap();
        assert_eq!(flow.current_index(), 1);
        flow.review_document().unwrap();
        assert_eq!(flow.phase(), Phase::Preview);
        assert!(flow.can_proceed());
        flow.proceed_to_signing().unwrap();
        assert_eq!(flow.current_index(), 1);
        assert_eq!(flow.completed_count(), 1);
    }

    #[test]
    fn completed_zone_is_read_only() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Text, ZoneRole::Owner, 2),
        ]);
        read_to_end(&mut flow);
        flow.complete_zone("a", ZoneInput::Text("premier".into())).unwrap();
        assert_eq!(
            flow.complete_zone("a", ZoneInput::Text("second".into())),
            Err(SigningError::ZoneAlreadyCompleted("a".into()))
        );
        assert_eq!(flow.zone_state(0).and_then(|s| s.value()), Some("premier"));
    }

    #[test]
    fn conciergerie_zones_are_rejected() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("c", ZoneType::Signature, ZoneRole::Conciergerie, 2),
        ]);
        read_to_end(&mut flow);
        assert_eq!(flow.owner_zones().len(), 1);
        assert_eq!(
            flow.complete_zone("c", ZoneInput::Text("x".into())),
            Err(SigningError::NotOwnerZone("c".into()))
        );
        assert_eq!(
            flow.complete_zone("zz", ZoneInput::Text("x".into())),
            Err(SigningError::UnknownZone("zz".into()))
        );
    }

    #[test]
    fn zones_cannot_be_completed_outside_signing() {
        let mut flow = flow_with(vec![zone("a", ZoneType::Text, ZoneRole::Owner, 1)]);
        flow.open_document().unwrap();
        assert_eq!(
            flow.complete_zone("a", ZoneInput::Text("x".into())),
            Err(SigningError::WrongPhase(Phase::Preview))
        );
    }

    #[test]
    fn navigation_visits_completed_zones() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Text, ZoneRole::Owner, 2),
        ]);
        read_to_end(&mut flow);
        flow.complete_zone("a", ZoneInput::Text("x".into())).unwrap();
        assert!(flow.previous_zone());
        assert_eq!(flow.current_zone().map(|z| z.id.as_str()), Some("a"));
        assert!(!flow.previous_zone());
        assert!(flow.next_zone());
        assert!(!flow.next_zone());
        assert!(!flow.select_zone(2));
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Text, ZoneRole::Owner, 2),
            zone("c", ZoneType::Text, ZoneRole::Owner, 3),
        ]);
        read_to_end(&mut flow);
        assert_eq!(flow.progress_percent(), 0);
        flow.complete_zone("a", ZoneInput::Text("x".into())).unwrap();
        assert_eq!(flow.progress_percent(), 33);
        flow.complete_zone("b", ZoneInput::Text("x".into())).unwrap();
        assert_eq!(flow.progress_percent(), 67);
    }

    #[test]
    fn finalize_gate_and_single_archive_call() {
        let mut flow = flow_with(vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Date, ZoneRole::Owner, 2),
        ]);
        let mut archive = Recorder(Vec::new());
        read_to_end(&mut flow);
        flow.complete_zone("a", ZoneInput::Text("x".into())).unwrap();
        assert!(!flow.can_finalize());
        assert_eq!(
            flow.finalize(signed_at(), None, &mut archive),
            Err(SigningError::IncompleteZones { remaining: 1 })
        );
        flow.complete_zone("b", ZoneInput::Date("01/04/2025".into())).unwrap();
        assert!(flow.can_finalize());
        let record = flow
            .finalize(signed_at(), Some("203.0.113.7".into()), &mut archive)
            .unwrap();
        assert_eq!(record.zone_data.len(), 2);
        assert_eq!(flow.phase(), Phase::Completed);
        assert_eq!(flow.session().signer_ip.as_deref(), Some("203.0.113.7"));
        assert!(flow.finalize(signed_at(), None, &mut archive).is_err());
        assert_eq!(archive.0.len(), 1);
    }

    #[test]
    fn archive_failure_leaves_session_open() {
        let mut flow = flow_with(vec![zone("a", ZoneType::Text, ZoneRole::Owner, 1)]);
        read_to_end(&mut flow);
        flow.complete_zone("a", ZoneInput::Text("x".into())).unwrap();
        let result = flow.finalize(signed_at(), None, &mut Offline);
        assert!(matches!(result, Err(SigningError::Archive(_))));
        assert_eq!(flow.phase(), Phase::Signing);
        assert_eq!(flow.session().status, SessionStatus::Viewed);
    }

    #[test]
    fn default_input_prefers_cache_then_field_key() {
        let mut named = zone("name", ZoneType::Text, ZoneRole::Owner, 1);
        named.field_key = Some("owner_name".into());
        let mut flow = flow_with(vec![
            named,
            zone("free", ZoneType::Text, ZoneRole::Owner, 2),
            zone("when", ZoneType::Date, ZoneRole::Owner, 3),
            zone("sig", ZoneType::Signature, ZoneRole::Owner, 4),
        ]);
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(flow.default_input("name", today).as_deref(), Some("Claire Martin"));
        assert_eq!(flow.default_input("free", today), None);
        assert_eq!(flow.default_input("when", today).as_deref(), Some("15/03/2025"));
        assert_eq!(flow.default_input("sig", today), None);

        read_to_end(&mut flow);
        flow.complete_zone("name", ZoneInput::Text("Claire M.".into())).unwrap();
        assert_eq!(flow.default_input("name", today).as_deref(), Some("Claire M."));
    }

    #[test]
    fn resume_rehydrates_completed_zones() {
        let mut template = SignatureTemplate::new("tpl", "Mandat");
        template.zones = vec![
            zone("a", ZoneType::Text, ZoneRole::Owner, 1),
            zone("b", ZoneType::Text, ZoneRole::Owner, 2),
        ];
        let session = SignatureSession::new("s1", "tpl", "Claire", "Annecy");
        let data = vec![SignatureZoneData {
            session_id: "s1".into(),
            zone_id: "a".into(),
            value: "déjà".into(),
        }];
        let flow = SigningFlow::resume(template.clone(), session.clone(), data).unwrap();
        assert_eq!(flow.completed_count(), 1);
        assert_eq!(flow.current_index(), 1);

        let foreign = vec![SignatureZoneData {
            session_id: "s2".into(),
            zone_id: "a".into(),
            value: "x".into(),
        }];
        assert!(matches!(
            SigningFlow::resume(template, session, foreign),
            Err(SigningError::ForeignZoneData(_))
        ));
    }

    #[test]
    fn submission_of_signed_session_is_refused() {
        let template = SignatureTemplate::new("tpl", "Mandat");
        let mut session = SignatureSession::new("s1", "tpl", "Claire", "Annecy");
        session.status = SessionStatus::Signed;
        assert!(matches!(
            SigningFlow::for_submission(template, session, Vec::new()),
            Err(SigningError::SessionClosed(SessionStatus::Signed))
        ));
    }

    #[test]
    fn template_without_owner_zones_is_immediately_finalizable() {
        let mut flow = flow_with(vec![zone("c", ZoneType::Signature, ZoneRole::Conciergerie, 1)]);
        read_to_end(&mut flow);
        assert_eq!(flow.progress_percent(), 100);
        assert!(flow.can_finalize());
    }
}
