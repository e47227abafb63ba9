//! Prompt templates for code questions and code explanations.

/// Builds a prompt asking `question` about `code`, answered in `language`.
pub fn ask_about_code(code: &str, question: &str, language: &str) -> String {
    format!(
        "Analyze the code and answer the question.\n\
         \n\
         Code:\n\
         ```\n\
         {code}\n\
         ```\n\
         \n\
         Question: {question}\n\
         \n\
         Requirement: answer the question in {language} in detail, giving complete and useful information.\n"
    )
}

/// Builds a prompt asking for a concise explanation of `code` in `language`.
pub fn explain_code(code: &str, language: &str) -> String {
    format!(
        "Analyze the following code and explain it in {language}:\n\
         \n\
         ```\n\
         {code}\n\
         ```\n\
         \n\
         Requirements:\n\
         1. Briefly and clearly describe the main function of the code\n\
         2. Explain the key implementation logic\n\
         3. Give a complete analysis, but keep the language concise\n"
    )
}
