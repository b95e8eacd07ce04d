//! The hat allocation pass.
//!
//! Allocation proceeds by ranking tokens by how likely they are to be
//! addressed (distance from the nearest cursor), then assigning each token
//! the cheapest hat still available for one of its graphemes. The stability
//! policy decides whether a token keeps the hat it wore in the previous
//! pass even when a cheaper candidate exists, so hats don't visibly jump
//! around while the user edits.
//!
//! Each (color, shape) style is worn by at most one token at a time, so
//! looking a style up in the hat map is unambiguous. Once the styles run
//! out, the remaining tokens are simply left unhatted; that is not an
//! error.
//!
//! The pass is a pure function of its inputs: identical tokens, cursors,
//! previous hats, styles, and policy produce identical output.

use std::collections::HashMap;

use crate::primitives::{Position, Range};
use crate::tokenizer::{Token, Tokenizer};

use super::style::{HatStability, HatStyle, HatStyleSetting};

/// A token together with the hat it was assigned and the range of the
/// grapheme the hat sits on.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenHat {
    pub style: HatStyle,
    pub grapheme: String,
    pub token: Token,
    pub hat_range: Range,
}

/// One (grapheme, style) option for a token. The grapheme text is
/// normalized case-insensitively and decides where the hat sits; the
/// style comes from the shared pool of unworn styles.
#[derive(Debug, Clone, Copy)]
struct HatCandidate<'a> {
    grapheme: &'a str,
    /// UTF-16 offset of the grapheme within the token.
    offset: usize,
    width: usize,
    style_index: usize,
    penalty: f64,
}

pub fn allocate_hats(
    tokens: &[Token],
    cursor_positions: &[Position],
    old_hats: &[TokenHat],
    enabled_styles: &[HatStyleSetting],
    stability: HatStability,
    tokenizer: &Tokenizer,
) -> Vec<TokenHat> {
    let ranked = rank_tokens(tokens, cursor_positions);

    // Previous bindings, grouped by token text so they survive edits that
    // shift byte offsets. Each token claims the positionally nearest one.
    let mut old_pool: HashMap<&str, Vec<&TokenHat>> = HashMap::new();
    for hat in old_hats {
        old_pool
            .entry(hat.token.text.as_str())
            .or_default()
            .push(hat);
    }

    // Styles not yet worn in this pass, as indices into `enabled_styles`
    let mut remaining: Vec<usize> = (0..enabled_styles.len()).collect();

    let mut result = Vec::new();

    for &token_index in &ranked {
        let token = &tokens[token_index];
        let normalized_graphemes = split_graphemes(token, tokenizer);

        let chosen = {
            let candidates =
                collect_candidates(&normalized_graphemes, &remaining, enabled_styles);
            let best = candidates
                .iter()
                .copied()
                .min_by(compare_candidates);

            let best = match best {
                Some(best) => best,
                None => continue, // styles exhausted; token goes unhatted
            };

            let old = claim_old_hat(&mut old_pool, token).and_then(|old| {
                candidates.iter().copied().find(|c| {
                    c.grapheme == old.grapheme
                        && enabled_styles[c.style_index].style == old.style
                })
            });

            match old {
                Some(old) if keeps_old_hat(stability, old.penalty, best.penalty) => old,
                _ => best,
            }
        };

        let key = chosen.grapheme.to_string();
        remaining.retain(|&i| i != chosen.style_index);

        result.push(TokenHat {
            style: enabled_styles[chosen.style_index].style,
            grapheme: key,
            token: token.clone(),
            hat_range: Range::new(
                token.range.start.translate(chosen.offset as i64),
                token
                    .range
                    .start
                    .translate((chosen.offset + chosen.width) as i64),
            ),
        });
    }

    // Present hats in document order regardless of allocation rank
    result.sort_by_key(|hat| (hat.token.offsets.start, hat.token.offsets.end));
    result
}

/// (normalized text, utf16 offset, utf16 width, is first letter of a word)
type NormalizedGrapheme = (String, usize, usize, bool);

fn split_graphemes(token: &Token, tokenizer: &Tokenizer) -> Vec<NormalizedGrapheme> {
    let words = tokenizer.split_words(&token.text);
    let first_letters: Vec<usize> = words.iter().map(|w| w.start).collect();

    let mut graphemes = Vec::new();
    let mut offset = 0;
    for ch in token.text.chars() {
        let width = ch.len_utf16();
        let normalized: String = ch.to_lowercase().collect();
        graphemes.push((
            normalized,
            offset,
            width,
            first_letters.contains(&offset),
        ));
        offset += width;
    }
    graphemes
}

/// The old hat whose token matches `token` by text, nearest by position.
/// Claimed hats are removed from the pool so two tokens with the same
/// text cannot both inherit the same binding.
fn claim_old_hat<'h>(
    pool: &mut HashMap<&str, Vec<&'h TokenHat>>,
    token: &Token,
) -> Option<&'h TokenHat> {
    let hats = pool.get_mut(token.text.as_str())?;
    let nearest = hats
        .iter()
        .enumerate()
        .min_by_key(|(_, hat)| {
            let start = hat.token.range.start;
            (
                start.line.abs_diff(token.range.start.line),
                start.character.abs_diff(token.range.start.character),
            )
        })
        .map(|(i, _)| i)?;
    Some(hats.swap_remove(nearest))
}

fn collect_candidates<'a>(
    graphemes: &'a [NormalizedGrapheme],
    remaining: &[usize],
    enabled_styles: &[HatStyleSetting],
) -> Vec<HatCandidate<'a>> {
    let mut candidates = Vec::new();
    for (text, offset, width, is_first_letter) in graphemes {
        for &style_index in remaining {
            // Non-first letters cost one extra point so hats prefer the
            // starts of words, which are easier to say out loud
            let penalty =
                enabled_styles[style_index].penalty + if *is_first_letter { 0.0 } else { 1.0 };
            candidates.push(HatCandidate {
                grapheme: text.as_str(),
                offset: *offset,
                width: *width,
                style_index,
                penalty,
            });
        }
    }
    candidates
}

fn compare_candidates(a: &HatCandidate<'_>, b: &HatCandidate<'_>) -> std::cmp::Ordering {
    a.penalty
        .total_cmp(&b.penalty)
        .then(a.style_index.cmp(&b.style_index))
        .then(a.offset.cmp(&b.offset))
}

fn keeps_old_hat(stability: HatStability, old_penalty: f64, best_penalty: f64) -> bool {
    match stability {
        HatStability::Greedy => old_penalty <= best_penalty,
        HatStability::Floor => old_penalty.floor() <= best_penalty.floor(),
        HatStability::Round => old_penalty.round() <= best_penalty.round(),
        HatStability::Threshold => old_penalty - best_penalty <= 2.0,
        HatStability::Stable => true,
    }
}

/// Orders tokens by how deserving they are of a cheap hat: distance from
/// the nearest cursor, preferring the token after the cursor on ties, then
/// document order for determinism.
fn rank_tokens(tokens: &[Token], cursor_positions: &[Position]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..tokens.len()).collect();

    indices.sort_by_key(|&i| {
        let token = &tokens[i];
        let key = cursor_positions
            .iter()
            .map(|&cursor| distance_key(token, cursor))
            .min()
            .unwrap_or((0, 0, 0));
        (key, token.offsets.start, token.offsets.end)
    });

    indices
}

fn distance_key(token: &Token, cursor: Position) -> (u32, u32, u8) {
    let start = token.range.start;
    let line_delta = start.line.abs_diff(cursor.line);
    let char_delta = if start.line == cursor.line {
        start.character.abs_diff(cursor.character)
    } else {
        0
    };
    let before = u8::from(start < cursor);
    (line_delta, char_delta, before)
}
