use crate::models::TripRequest;

pub fn day_label(day: u32) -> String {
    format!("Day {}", day)
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "unspecified"
    } else {
        value
    }
}

/// Full instruction for the generator: trip conditions, grounding places, output contract.
pub fn build_plan_prompt(request: &TripRequest, context: &str) -> String {
    let style = &request.travel_style;
    let labels = (1..=request.duration)
        .map(|day| format!("\"{}\"", day_label(day)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are an expert travel planner. Build a trip itinerary using the conditions and the <retrieved places> below.\n\
         \n\
         ### Conditions\n\
         - Destination: {destination}\n\
         - Duration: {duration} days\n\
         - Travelers: {people}\n\
         - Travel style:\n\
         \x20   - Planning: {planning}\n\
         \x20   - Pace: {pace}\n\
         \x20   - Interests: {interests}\n\
         \x20   - Budget: {budget}\n\
         \n\
         ### <retrieved places>\n\
         {context}\n\
         \n\
         ### Output format (JSON)\n\
         - Return a single JSON object with exactly {duration} keys: {labels}.\n\
         - The value of each key is an ordered list of strings, one per activity.\n\
         - Example: {{ \"Day 1\": [\"Morning: Visit Schonbrunn Palace\", \"Lunch: Wiener schnitzel at a local restaurant\", \"Afternoon: See Klimt at the Belvedere\"], \"Day 2\": [...] }}\n\
         - Start every activity with its time of day: Morning, Lunch, Afternoon or Evening.\n\
         - Use only places from <retrieved places> where possible, ordered so each day follows a sensible route.\n",
        destination = request.destination,
        duration = request.duration,
        people = request.person_count,
        planning = or_unspecified(&style.planning_style),
        pace = or_unspecified(&style.pace),
        interests = style.interests.join(", "),
        budget = or_unspecified(&style.budget),
        context = context,
        labels = labels,
    )
}
