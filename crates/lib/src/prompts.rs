//! # Prompt Templates
//!
//! The two fixed template pairs used by the pipeline: one instructs the
//! model to emit a single SQLite SELECT statement for the survey schema, the
//! other instructs it to summarize an executed result table in prose.

/// The system prompt for the query generation stage.
pub const QUERY_GENERATION_SYSTEM_PROMPT: &str = "You are an expert SQLite query generator. \
Respond only with the SQL query (no text, no markdown).";

/// The user prompt for the query generation stage.
///
/// Placeholders: `{table_info}`, `{input}`
pub const QUERY_GENERATION_USER_PROMPT: &str = r#"Database schema:
{table_info}

Important rules:
- Use only SELECT queries.
- Table "Sheet1" has: Question_no, Question, Answer.
- Table "Sheet2" has user responses. The column headers are the questions and the row values are each column's responses.
  - PRET1 -> PRET15 = pre-test answers for questions 1 -> 15.
  - POSTT1 -> POSTT15 = post-test answers for questions 1 -> 15.
  - PRET_SCORE and POSTT_SCORE store total scores.
- To check correctness, compare PRETn or POSTTn against Sheet1.Answer where Question_no = n.
- Always return syntactically valid SQLite queries.
- Do not invent table names or columns.

Question: {input}
SQLQuery:"#;

/// The system prompt for the summarization stage.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are a medical data assistant. \
Keep your answers concise but do not miss important details. \
Do not give medical advice, only describe the data.";

/// The user prompt for the summarization stage.
///
/// Placeholders: `{question}`, `{data}`
pub const SUMMARY_USER_PROMPT: &str = r#"The doctor asked: {question}
Here are the retrieved results:
{data}

Summarize and explain the trends in natural language. Answer the question subtly."#;

/// Interpolates the schema rendering and the user's question into the
/// query-generation user prompt.
pub fn build_query_prompt(table_info: &str, question: &str) -> String {
    QUERY_GENERATION_USER_PROMPT
        .replace("{table_info}", table_info)
        .replace("{input}", question)
}

/// Interpolates the question and the text-rendered result table into the
/// summarization user prompt.
pub fn build_summary_prompt(question: &str, data: &str) -> String {
    SUMMARY_USER_PROMPT
        .replace("{question}", question)
        .replace("{data}", data)
}
