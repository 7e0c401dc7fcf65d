//! 题库领域模型
//!
//! 两棵互不关联的所有权树：Subject -> Course，Quiz -> Question -> Choice（以及 Quiz -> Badge）

pub mod badge;
pub mod enums;
pub mod question;
pub mod quiz;
pub mod subject;

// 重新导出常用类型
pub use badge::{BADGE_UPLOAD_DIR, Badge, NewBadge};
pub use enums::{ChoicePosition, QuizLevel};
pub use question::{Choice, NewChoice, NewQuestion, Question, QuestionWithChoices};
pub use quiz::{
    DEFAULT_DURATION_MINUTES, DEFAULT_FAIL_TEXT, DEFAULT_SUCCESS_TEXT, MAX_PASS_MARK, NewQuiz,
    Quiz, QuizDetail,
};
pub use subject::{Course, NewCourse, NewSubject, Subject};
