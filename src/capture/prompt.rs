use super::{CaptureCourse, CapturePlayer};

/// Scorecard extraction instructions with the candidate players and courses inlined.
#[must_use]
pub fn build_prompt(players: &[CapturePlayer], courses: &[CaptureCourse]) -> String {
    let players_context = players
        .iter()
        .map(|p| format!("{} {} (ID: {})", p.first_name, p.last_name, p.id))
        .collect::<Vec<_>>()
        .join(", ");
    let courses_context = courses
        .iter()
        .map(|c| format!("{} (ID: {})", c.name, c.id))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You read golf scorecards. The attached image shows a scorecard or a written list of scores.

Available Players: {players_context}

Available Courses: {courses_context}

Extract the following and answer in JSON:
1. The player on the card, using the exact player id from the list above. Use null when nobody matches.
2. The course being played, using the exact course id from the list above. Use null when no course matches.
3. The score of every hole as hole_number and gross_score. A round is usually 18 holes and the card may split them over two rows.
4. Each player's gross_score total, which must equal the sum of that player's 18 hole scores.
5. The date the round was played, if one is visible.

Return ONLY a valid JSON object shaped like this:
{{
  "course_id": "course id from the list",
  "played_at": "2024-01-15",
  "round_scores": [
    {{
      "player_id": "player id from the list",
      "player_name": "A.Bosch",
      "gross_score": 72,
      "round_score_holes": [
        {{"hole_number": 1, "gross_score": 4}},
        {{"hole_number": 2, "gross_score": 5}}
      ]
    }}
  ]
}}
played_at may be omitted. player_name is the first initial and the last name as written on the card."#
    )
}
