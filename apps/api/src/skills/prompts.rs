// Oracle prompt templates for every skill pipeline stage.
// Placeholders are substituted with `llm_client::prompts::render`; list inputs are embedded as JSON.

/// System prompt for résumé structuring.
pub const RESUME_STRUCTURE_SYSTEM: &str = "You are a precise assistant that extracts structured data from CVs. \
    You MUST respond with valid JSON only — no markdown fences, no explanations.";

/// Résumé structuring prompt. Replace `{cv_text}`.
pub const RESUME_STRUCTURE_PROMPT: &str = r#"You extract structured information from resumes (CVs). The input is raw, unstructured text parsed from a PDF or DOCX CV.

Return a JSON object with the following fixed and consistently named top-level fields:

1. "work_experience": a list of work roles with "job_title", "organization", "period" and "responsibilities" (a list of bullet points)
2. "education": a list of entries with "degree", "university" and "graduation_year"
3. "programming_languages_and_technical_skills": a flat list of skill names (e.g. "Python", "SQL", "Git")
4. "projects": a list of projects with "name", "technologies_used" (a list) and "outcomes" (short description)
5. "certifications_and_languages": an object with
   - "certifications": a list of {"name", "institution", "year"}
   - "languages_spoken": a list of {"language", "proficiency"}

Use only the keys shown above. Do not use any other names or formats.
{json_only}

CV TEXT:
{cv_text}"#;

/// Skill extraction over a batch of job postings. Replace `{count}`, `{descriptions_json}`.
pub const EXTRACTION_PROMPT: &str = r#"You analyze job advertisements.

Extract the relevant skills, tools, technologies and job-related competencies mentioned in each of the {count} job descriptions below. Focus on specific, actionable skill names (e.g. "Python", "Git", "CI/CD", "Project Management"), not broad categories (e.g. "Software Development").

Return a JSON list of lists with EXACTLY {count} inner lists, in the same order as the descriptions. Inner list i holds the skills found in description i; use an empty list when a description names no skills.

Return format example:
[
  ["Python", "Docker", "Agile"],
  ["JavaScript", "React", "Git"],
  ["SQL", "Scrum", "Team leadership"]
]

{json_only}

DESCRIPTIONS (JSON array):
{descriptions_json}"#;

/// Skill normalization. Replace `{skills_json}`.
pub const NORMALIZE_PROMPT: &str = r#"Normalize and expand the following list of skills. For each skill:
- Expand abbreviations (e.g. JS → JavaScript, Py → Python)
- Standardize synonyms (e.g. coding → programming)
- Return canonical, full-length, lowercase names where possible
- Do not split multi-word skills into separate words ("CI/CD" stays "CI/CD" or becomes "Continuous Integration / Continuous Deployment")
- Do not add skills that are not in the input

Skills:
{skills_json}

Return the result as a JSON list of clean skill names with no duplicates.
{json_only}"#;

/// Taxonomy matching. Replace `{skills_json}`.
pub const TAXONOMY_PROMPT: &str = r#"You are a skill normalization assistant aligned with the ESCO and O*NET databases.

For each skill below:
- Match it to the most specific and semantically correct skill label in ESCO or O*NET.
- Do NOT generalize. For example, match "programming" as "Programming" — not "Software Development".
- Do not add verbs or modifiers like "use", "develop in", "working with".
- Return only the skill label as it appears in ESCO/O*NET. If the exact match is "Java", return "Java", not "use Java" or "Java programming".
- If no match exists, return the skill exactly as it appears in the input.

Input skills:
{skills_json}

Return a JSON object mapping EVERY input skill (verbatim, as the key) to its best standardized equivalent.
{json_only}"#;

/// Skill suggestion from a free-text self-description. Replace `{description}`.
pub const SUGGEST_PROMPT: &str = r#"The user describes what they do in a natural, human way (e.g. "I work on cloud infrastructure, mostly with AWS and CI/CD").

Extract the key technical or soft skills they describe, especially those relevant to job matching as listed in ESCO/O*NET.

Normalize the names:
- Expand abbreviations (e.g. CI/CD → Continuous Integration / Continuous Deployment) but do not split them into multiple skills
- Map skills to standard labels (e.g. "coding in Java" → "Java")
- Avoid verbs or modifiers like "working with" or "use"
- Prefer one word or a well-known phrase per skill

Return only a JSON list of clean skill names, like ["Java", "Git", "Continuous Deployment"].

USER DESCRIPTION:
{description}

{json_only}"#;

/// Skill validation. Replace `{skills_json}`.
pub const VALIDATE_PROMPT: &str = r#"Given the following list of items, return only those that are valid skills, technologies, tools, or professional concepts.
Ignore any that are:
- Not real words (e.g. "baba", "sdfsdf")
- Not known in tech, business, science, design or another professional domain
Accept valid but niche names like "CATIA", "SAS", "Blender". When in doubt about a real term, keep it.

Return a JSON list containing only the valid items, spelled exactly as in the input.

Input:
{skills_json}

{json_only}"#;

/// Core / optional classification. Replace `{job_title}`, `{country}`, `{skills_json}`.
pub const CLASSIFY_PROMPT: &str = r#"Classify the following skills into core and optional for a modern {job_title} in {country}.
- Core = needed in almost all roles with this title.
- Optional = only needed in some roles or projects.

Take only technical and soft skills into account, not spoken-language requirements.
Do not include any skill that is the same as the job title.
Do not include duplicates. Do not place a skill in both lists.
Use the skill names exactly as given.

Skills:
{skills_json}

Return JSON: {"core": [...], "optional": [...]}
{json_only}"#;

/// Job-title validity check. Replace `{title}`. Free-text answer.
pub const JOB_TITLE_PROMPT: &str = r#"Decide if the following string is a real and meaningful job title in a professional context. Examples of valid titles include "software engineer", "data analyst", or "project manager".

Title: "{title}"
Respond with "yes" if valid, otherwise "no"."#;

pub const JOB_TITLE_SYSTEM: &str =
    "You are a careful labour-market assistant. Answer with a single word: yes or no.";
