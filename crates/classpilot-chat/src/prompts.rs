//! Prompt assembly. Pure string building, no I/O.

use crate::types::RetrievedPassage;

/// Analysis request for one uploaded document.
pub fn document_analysis_prompt(doc_name: &str, doc_text: &str, question: &str) -> String {
    format!(
        "You are reviewing the uploaded document \"{name}\" for a teacher.\n\
         \n\
         Document content:\n{text}\n\
         \n\
         Teacher's question: {question}\n\
         \n\
         Please:\n\
         1. Extract the key requirements stated in this document.\n\
         2. Relate those requirements to the teacher's question.\n\
         3. Flag where the question aligns with the requirements and where there are gaps.\n\
         4. Recommend concrete next steps.\n\
         \n\
         Cite exact passages from the document to support each point.",
        name = doc_name,
        text = doc_text,
        question = question,
    )
}

/// Synthesis request over the retrieved passages, with the citation-quoting
/// format the final report expects.
pub fn synthesis_prompt(
    question: &str,
    context_lines: &[String],
    passages: &[RetrievedPassage],
) -> String {
    let mut prompt = String::from(
        "You are answering a teacher's question using passages retrieved from a \
         curriculum knowledge base.\n",
    );

    if !context_lines.is_empty() {
        prompt.push_str("\nTeaching context:\n");
        for line in context_lines {
            prompt.push_str("- ");
            prompt.push_str(line);
            prompt.push('\n');
        }
    }

    prompt.push_str("\nRetrieved passages:\n");
    for (i, passage) in passages.iter().enumerate() {
        prompt.push_str(&format!("\n[{}] {}\n", i + 1, passage.text));
    }

    prompt.push_str(&format!(
        "\nQuestion: {}\n\
         \n\
         Answer using only the passages above. When you use a passage, quote it \
         in the form \"quoted text\" [N], where N is the passage number.",
        question
    ));

    prompt
}

/// System sentence for the single-call chat path: assistant persona plus the
/// rendered facet context.
pub fn assistant_system_message(context_lines: &[String]) -> String {
    let mut message = String::from("You are a helpful AI assistant.");
    if !context_lines.is_empty() {
        message.push_str(&format!(" Context: {}.", context_lines.join(", ")));
    }
    message
}
