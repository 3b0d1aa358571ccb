use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "instrument.ts")]
pub struct CreateInstrumentRequest {
    pub name: String,
}
