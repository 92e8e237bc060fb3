//! Information Element codecs: one encode/decode pair per IE,
//! grouped by the message that mostly owns them.

pub mod cdma2000;
pub mod cell_access;
pub mod codec;
pub mod neighbors;
pub mod paging;
pub mod plmn;
pub mod reselection;
