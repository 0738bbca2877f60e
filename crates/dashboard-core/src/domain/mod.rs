//! 대시보드 분석을 위한 도메인 모델.

mod grade;
mod instrument;
mod news;
mod source;

pub use grade::*;
pub use instrument::*;
pub use news::*;
pub use source::*;
