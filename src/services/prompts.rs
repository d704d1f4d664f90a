/// Preamble sent ahead of every user request.
pub const ITINERARY_INSTRUCTION: &str = r#"You are an expert travel planner. Create a detailed travel itinerary in valid JSON format.

IMPORTANT: Return ONLY valid JSON, no other text.

JSON Format:
{
  "destination": "City, Country",
  "duration": "X days/Y nights",
  "budgetLevel": "Budget/Mid-range/Luxury",
  "bestSeason": "Season/Months",
  "estimatedCost": "$min-$max",
  "highlights": ["highlight1", "highlight2", "highlight3"],
  "itinerary": [
    {
      "day": 1,
      "theme": "Day theme",
      "morning": "Activity description",
      "afternoon": "Activity description",
      "evening": "Activity description",
      "accommodation": "Hotel/lodge suggestion"
    }
  ],
  "packingTips": ["tip1", "tip2", "tip3"],
  "localCuisine": ["dish1", "dish2"],
  "safetyNotes": ["note1", "note2"]
}

Use exactly one of "Budget", "Mid-range" or "Luxury" for budgetLevel. Number days from 1 without gaps. Use "N/A" for a time slot or accommodation that does not apply."#;

const CLOSING: &str = "Generate a complete itinerary based on the user's request.";

/// Join the instruction preamble and the user's text into one prompt.
pub fn build_itinerary_prompt(instruction: &str, user_text: &str) -> String {
    format!(
        "{}\n\nUser Request: {}\n\n{}",
        instruction.trim_end(),
        user_text.trim(),
        CLOSING
    )
}
