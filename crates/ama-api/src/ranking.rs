//! Display order for a room's questions.
//!
//! Most likes first, then newest first, then question id ascending so that
//! exact ties still come out the same way every time. `answered` plays no
//! part in the order. Nothing is kept between calls; the order is rebuilt
//! from current counts on each listing.

use std::cmp::Ordering;

use ama_types::api::QuestionView;

pub fn ranking_order(a: &QuestionView, b: &QuestionView) -> Ordering {
    b.like_count
        .cmp(&a.like_count)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn rank(mut questions: Vec<QuestionView>) -> Vec<QuestionView> {
    questions.sort_by(ranking_order);
    questions
}
