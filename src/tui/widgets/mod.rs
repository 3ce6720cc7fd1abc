pub mod common;
pub mod modal_dialog;
pub mod selectable_table;
pub mod text_input;

pub use modal_dialog::{DialogType, ModalDialog};
pub use selectable_table::{ColumnDef, SelectableTable};
pub use text_input::TextInput;
