//! Prompt templates for the extraction pipeline

/// Build the question-answering prompt around retrieved context.
pub fn qa_prompt(format_instructions: Option<&str>, query: &str, context: &str) -> String {
    let instructions = match format_instructions {
        Some(instructions) => format!("{}\n", instructions),
        None => String::new(),
    };
    format!(
        "You are an assistant for question-answering tasks. Use the following pieces \
         of retrieved context to answer the question.\n\
         Question:\n{instructions}{query}\n\
         Context: {context}\n\
         Answer:"
    )
}

/// Prompt asking for a concise summary of a whole document.
pub fn summary_prompt(document: &str) -> String {
    format!(
        "Summarize the following document in a concise manner:\n{document}\n\nSummary:"
    )
}

/// Prompt asking for a short context line to prepend to one chunk, given the
/// parent document's summary.
pub fn chunk_context_prompt(summary: &str, chunk: &str) -> String {
    format!(
        "Given the following summary of the document:\n{summary}\n\n\
         Please generate a concise context that should be appended to the following chunk:\n\
         {chunk}\n\nContext:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_prompt_includes_all_parts() {
        let prompt = qa_prompt(Some("Respond with JSON."), "What is the price?", "ctx text");
        assert!(prompt.contains("Respond with JSON."));
        assert!(prompt.contains("What is the price?"));
        assert!(prompt.contains("ctx text"));
    }

    #[test]
    fn qa_prompt_without_instructions() {
        let prompt = qa_prompt(None, "Summarize the offer", "ctx");
        assert!(prompt.contains("Question:\nSummarize the offer"));
    }
}
