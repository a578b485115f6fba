//! Prompt construction for trip plans

use std::fmt::Write;

use crate::attractions::AttractionRecord;
use crate::gemini::END_OF_PLAN;
use crate::models::TripRequest;

/// Budget categories the model must split the total across
pub const BUDGET_CATEGORIES: [&str; 4] = [
    "accommodation",
    "food",
    "activities_and_transport",
    "shopping_and_miscellaneous",
];

/// Build the single instruction block sent to the model.
///
/// Destination and attraction text are embedded verbatim.
#[must_use]
pub fn build_prompt(request: &TripRequest, attractions: &[AttractionRecord]) -> String {
    let destination = &request.destination;
    let days = request.days_text();
    let budget = request.budget_text();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a travel planner AI. Plan a {days}-day trip to {destination}."
    );
    prompt.push('\n');
    prompt.push_str("Rules:\n");
    let _ = writeln!(prompt, "1. The total budget MUST be exactly ${budget}.");
    let _ = writeln!(
        prompt,
        "2. Distribute the budget across accommodation, food, activities/transport, shopping/miscellaneous. \
         The breakdown values MUST add up to exactly {budget}."
    );
    prompt.push_str("3. Use these local attractions if relevant:\n");
    prompt.push_str(&attraction_lines(attractions));
    prompt.push_str("4. Output in valid JSON only with the structure:\n");
    prompt.push_str(&output_schema(&budget));
    let _ = writeln!(
        prompt,
        "Return JSON only. Do not add explanations. Finish output with \"{END_OF_PLAN}\"."
    );
    prompt.push('\n');
    let _ = write!(
        prompt,
        "User request: Plan a trip to {destination} for {days} days with a budget of ${budget}."
    );

    prompt
}

fn attraction_lines(attractions: &[AttractionRecord]) -> String {
    if attractions.is_empty() {
        return "- (no local attraction data available; use your own knowledge)\n".to_string();
    }

    attractions.iter().fold(String::new(), |mut lines, a| {
        let _ = writeln!(lines, "- {} ({}): {}", a.name, a.kind, a.description);
        lines
    })
}

fn output_schema(budget: &str) -> String {
    let day = |n: u32| {
        format!(
            "    {{\n      \"day\": {n},\n      \"plan\": {{\n        \"morning\": \"...\",\n        \"afternoon\": \"...\",\n        \"evening\": \"...\"\n      }}\n    }}"
        )
    };
    let breakdown = BUDGET_CATEGORIES
        .iter()
        .map(|category| format!("      \"{category}\": ..."))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "{{\n  \"destination\": \"...\",\n  \"days\": ...,\n  \"daily_plan\": [\n{},\n{}\n  ],\n  \"budget_estimate\": {{\n    \"total\": {budget},\n    \"breakdown\": {{\n{breakdown}\n    }}\n  }}\n}}\n",
        day(1),
        day(2)
    )
}
