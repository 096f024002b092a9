pub mod notice_log;

pub use notice_log::NoticeLog;
