mod command_input;
mod connect_form;
mod input;
mod key_result;
mod search_input;
mod status_picker;

pub use command_input::{CommandEvent, CommandInput};
pub use connect_form::{ConnectEvent, ConnectForm};
pub use key_result::KeyResult;
pub use search_input::{SearchEvent, SearchInput};
pub use status_picker::{StatusPicker, StatusPickerEvent};
