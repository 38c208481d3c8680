use common::model::session::{FinalizedSignature, SignatureSession, SignatureZoneData};
use common::requests::SessionBundle;
use common::signing::{ScrollMetrics, ZoneInput};

pub enum Msg {
    Loaded(Result<SessionBundle, String>),
    Start,
    Viewed(Result<SignatureSession, String>),
    Scrolled(ScrollMetrics),
    /// Re-reads the preview scroll position, e.g. once pages have loaded.
    CheckScroll,
    PageCount(u32),
    Proceed,
    Review,
    SelectZone(usize),
    NextZone,
    PreviousZone,
    TextChanged(String),
    SubmitZone(ZoneInput),
    ZoneStored {
        zone_id: String,
        input: ZoneInput,
        result: Result<SignatureZoneData, String>,
    },
    Finalize,
    Finalized(Result<FinalizedSignature, String>),
}
