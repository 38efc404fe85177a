pub mod block;
pub mod grid;
pub mod html;
pub mod layout;
pub mod logging;
pub mod notes;
pub mod notify;
pub mod settings;
pub mod ui;
pub mod vault;
pub mod video_id;
pub mod yt;
