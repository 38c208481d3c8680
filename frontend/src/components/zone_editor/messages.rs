use common::editor::UploadTicket;
use common::model::template::SignatureTemplate;
use common::model::zone::{ZoneType, ZoneUpdate};
use common::requests::CreateSessionResponse;

pub enum Msg {
    SetTemplate(SignatureTemplate),
    SetName(String),
    SetPropertyName(String),
    AddZone(ZoneType),
    RemoveZone(String),
    SelectZone(Option<String>),
    UpdateZone(String, ZoneUpdate),
    /// Pointer pressed on a zone, in client pixels.
    PointerDown { zone_id: String, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Resized(f64),
    PageCount(u32),
    NextPage,
    PreviousPage,
    OpenFileDialog,
    FileSelected(web_sys::File),
    UploadFinished(UploadTicket, Result<String, String>),
    Save,
    SaveFinished(Result<(), String>),
    OpenSessionDialog,
    SetOwnerName(String),
    SetPropertyAddress(String),
    SetCommissionRate(String),
    IssueSession,
    SessionIssued(Result<CreateSessionResponse, String>),
    CloseSessionDialog,
}
