//! Picking the final answer from per-chunk results

use crate::types::{ChunkAnswer, FinalAnswer};

/// First chunk answer with non-blank text wins, in chunk order.
/// Failed chunks are passed over; with nothing usable the fallback is returned.
pub fn select_answer(answers: &[ChunkAnswer]) -> FinalAnswer {
    answers
        .iter()
        .find_map(|answer| {
            answer
                .answer_text()
                .map(|text| FinalAnswer::from_chunk(answer.chunk_index, text))
        })
        .unwrap_or_else(FinalAnswer::fallback)
}
