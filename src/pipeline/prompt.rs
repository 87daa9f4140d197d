//! Prompt rendering
//!
//! Wraps the assembled context in a generation instruction: either the
//! caller's custom instructions verbatim, or a default template whose
//! preamble mentions the enabled context options.

use crate::pipeline::options::ContextOptions;

/// Render the generation prompt for `context`
pub fn build_prompt(options: Option<&ContextOptions>, context: &str) -> String {
    if let Some(options) = options
        && !options.custom_prompt().is_empty()
    {
        return format!(
            "Generate documentation for the following GitHub repository content \
             based on these instructions:\n\n{}\n\nRepository files:\n{}\n\n",
            options.custom_prompt(),
            context
        );
    }

    let documentation_type = match options {
        Some(options) => {
            let mut mentions = String::new();
            if options.include_readme {
                mentions.push_str("README content, ");
            }
            if options.include_source_code {
                mentions.push_str("key code explanations, ");
            }
            if options.include_issues {
                mentions.push_str("issue summaries, ");
            }
            if options.include_pull_requests {
                mentions.push_str("pull request details, ");
            }
            format!("brief but comprehensive documentation with {}", mentions)
        }
        None => "brief but comprehensive documentation".to_string(),
    };

    format!(
        "Generate {} for the following GitHub repository content.\n\
         Focus on the most important details and make the documentation concise but informative.\n\
         Structure the documentation with clear headings and organize the information for easy reading.\n\
         Include a directory structure overview to help understand the project organization.\n\
         \n\n{}\n\n",
        documentation_type, context
    )
}
