pub mod executor;
pub mod plan;

pub use executor::{Mkvmerge, RemuxExecutor};
pub use plan::{
    Clause, RemuxPlan, SubtitleSettings, VideoSettings, build_media_plan, build_subtitle_plan,
};
