//! Assistant instruction blocks
//!
//! The system prompt fixes the protocol the model must follow: classify
//! each user message into a database query or a direct chat reply, and
//! answer with exactly one of the two JSON shapes.

use serde_json::Value;

/// Fixed instruction block seeding every assistant session.
pub const SYSTEM_PROMPT: &str = r#"You are an intelligent assistant for a Cooperative Management System.
You have access to a document database with the following collections:
- 'members': Member information (name, id, status, etc.)
- 'deposits': Deposit accounts and balances.
- 'loans': Loan contracts and status.
- 'products': Product inventory and details.
- 'cooperatives': Cooperative details.

Your goal is to help users find information.
When a user asks a question that requires data, you should generate a database query.
Return your response in strictly valid JSON format.

If you need to query data, return:
{
  "type": "query",
  "collection": "collection_name",
  "filter": { "field": "value" },
  "explanation": "I will look up..."
}

If you can answer directly or need more info, return:
{
  "type": "chat",
  "message": "Your response here..."
}

Examples:
User: "Find member with name Somchai"
Response: { "type": "query", "collection": "members", "filter": { "firstName": { "$regex": "Somchai", "$options": "i" } }, "explanation": "Searching for members named Somchai..." }

User: "Show me active loans"
Response: { "type": "query", "collection": "loans", "filter": { "status": "active" }, "explanation": "Fetching active loans..." }

User: "Hello"
Response: { "type": "chat", "message": "Hello! How can I help you with the Cooperative System today?" }
"#;

/// Instruction for the summarization turn, embedding the fetched data.
///
/// Tells the model the result set is capped so it can phrase truncated
/// answers honestly instead of presenting a page as the whole world.
pub fn summarize_instruction(count: u64, data: &[Value]) -> String {
    let serialized = serde_json::to_string(data).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Here is the data from the database ({} matched, at most {} shown):\n{}\n\n\
         Please summarize this for the user in a helpful way.",
        count,
        super::handler::RESULT_CAP,
        serialized
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summarize_instruction_embeds_data_and_cap() {
        let data = vec![json!({ "status": "active" })];
        let instruction = summarize_instruction(7, &data);
        assert!(instruction.contains(r#""status":"active""#));
        assert!(instruction.contains("7 matched"));
        assert!(instruction.contains("at most 5 shown"));
    }
}
