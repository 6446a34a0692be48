use serde::{Deserialize, Serialize};

/// The `{ ok, data?, error? }` wrapper every endpoint responds with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Yields `data` whenever it is present. `ok` and `error` are not consulted.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
