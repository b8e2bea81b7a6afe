// Prompt templates for text-generation calls.

/// Resume condensation prompt. Replace `{resume_text}` before sending.
pub const RESUME_SUMMARY_PROMPT: &str = r#"You are an assistant helping recruiters compare candidates.
From the resume below, extract ONLY the following three sections:

TECHNICAL SKILLS:
- languages, frameworks, tools, platforms

PROJECTS:
- project title: one or two sentence description

WORK EXPERIENCE:
- role, company, duration: short summary of responsibilities and impact

Ignore everything else: name, email, phone, address, links, career objective,
school grades, hobbies and interests. Do not invent details that are not in the resume.
If a section has no content, write "None".

RESUME TEXT:
{resume_text}"#;
