//! Prompt text and response schema for quiz generation.

use kqa_quiz::{Category, QUESTIONS_PER_QUIZ};
use serde_json::{Value, json};

/// Category specific guidance appended to the question prompt.
const fn category_guidance(category: Category) -> Option<&'static str> {
    match category {
        Category::ReadingAdventure => Some(
            "Write a short story of 2-3 sentences in the 'passage' field and ask a question about it.",
        ),
        Category::RamayanaForKids | Category::MahabharataTales | Category::IndianMythology => Some(
            "Use simplified, kid-friendly retellings that focus on the heroes and their moral lessons.",
        ),
        Category::GlobalMythology => Some("Draw on Greek, Norse or Egyptian myths."),
        Category::ScienceExplorers | Category::SocialStudies => Some(
            "Stick to 3rd-grade curriculum topics such as the water cycle or local government.",
        ),
        _ => None,
    }
}

/// The instruction sent to the question model.
pub fn question_prompt(category: Category) -> String {
    let mut prompt = format!(
        "Generate {QUESTIONS_PER_QUIZ} interesting multiple-choice quiz questions for \
         3rd-grade students (8-9 years old) in the category: {}.\n",
        category.name()
    );

    if let Some(guidance) = category_guidance(category) {
        prompt.push_str(guidance);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nEach object in the JSON array must have:\n\
         - id: a unique string.\n\
         - prompt: the question.\n\
         - options: exactly 4 different choices.\n\
         - correctAnswer: the correct choice, copied exactly from options.\n\
         - imageDescription: a vivid, simple description for an AI to draw an image for this question.\n\
         - explanation: a \"Did you know?\" style fun fact for kids.\n",
    );

    if category.is_comprehension() {
        prompt.push_str("- passage: the short story the question is about.\n");
    } else {
        prompt.push_str("Do not include a passage.\n");
    }

    prompt.push_str("\nMake the content exciting and use vocabulary suitable for 3rd graders.");
    prompt
}

/// The instruction sent to the image model.
pub fn image_prompt(description: &str) -> String {
    format!(
        "High quality, kid-friendly, vibrant, clear cartoon illustration of: {description}. \
         Bright colors, simple shapes, 3D claymation style, white background."
    )
}

/// JSON schema constraining the question model's output.
pub fn question_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "prompt": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                },
                "correctAnswer": { "type": "STRING" },
                "imageDescription": { "type": "STRING" },
                "explanation": { "type": "STRING" },
                "passage": { "type": "STRING" }
            },
            "required": ["id", "prompt", "options", "correctAnswer", "imageDescription", "explanation"]
        }
    })
}
