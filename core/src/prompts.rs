//! Prompt templates and fixed user-facing messages.

pub const GREETINGS: &[&str] = &[
    "Let me think how I can help you... 🤔",
    "Just a moment, I'm thinking... 💭",
    "Give me a second, I'm on it... ⏳",
    "Hold on, let me figure this out... 🧐",
    "One moment, I'm processing your request... ⏲️",
    "Working on your request... 🚀",
    "Let's see what we can do... 🕵️‍♂️",
    "Let's get this sorted... 🗂️",
    "Hang tight, I'm on the case... 🕵️‍♀️",
];

pub const NOT_FOUND_MESSAGE: &str = "I could not find an answer to your question. Please try again.";
pub const MODEL_UNAVAILABLE_MESSAGE: &str =
    "No language model is available. Check the model configuration and try again.";
pub const OFF_TOPIC_MESSAGE: &str = "I'm sorry, I can only help with aem related topics.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while handling your request. Please try again.";
pub const NETWORK_ERROR_MESSAGE: &str = "Some Network issues. Please try again..";
pub const NO_IMAGE_MESSAGE: &str = "I need a picture to generate a response.";
pub const NO_RESPONSE_MESSAGE: &str = "No response from the model";
pub const REPOSITORY_NOT_FOUND_MESSAGE: &str = "Repository details not found.";
pub const ISSUE_NUMBER_NOT_FOUND_MESSAGE: &str = "Issue number not found.";
pub const ISSUES_HELP_MESSAGE: &str = "I'm not sure how to help with that. You can ask for the 'latest issue', 'list all issues', or about a specific 'issue #number'.";

pub const CREATE_FILES_COMMAND: &str = "aem.createFiles";
pub const CREATE_FILES_TITLE: &str = "Create Block";
pub const FETCH_ISSUE_COMMAND: &str = "aem.fetchIssueDetails";

/// Answers from documentation pages passed as an assistant message.
pub const DOCS_SYSTEM_MESSAGE: &str = "You are a customer support agent specialized in AEM projects. \
You are answering questions based on a set of provided documents by the assistant. \
The provided documents are formatted in JSON format, with each containing at least a title, a content and a url. \
Whenever you use content from one of the documents, attribute this with the url of the document. \
If you are not sure, answer with \"I can only answer questions about AEM.\"";

pub const INFO_SYSTEM_MESSAGE: &str = r#"You are an expert on AEM Edge Delivery Services blocks. You are tasked with providing information about AEM Edge Delivery Services blocks and sample code.
An Edge Delivery Services block requires the following files to be generated along with sample code:
  - a folder named after the block (block_name)
  - JavaScript file: block_name/block_name.js
  - CSS file: block_name/block_name.css
  - other JavaScript files referenced by block_name.js if necessary
An Edge Delivery Services block JavaScript file exports a default function called decorate that takes the block, an HTML element, and decorates it.
The block element contains the HTML structure of the block depending on the block type.
Given the block name and its input details, generate the folder/file structure and sample code for each file.

Sample code:
- columns.js:
```javascript
export default function decorate(block) {
  const cols = [...block.firstElementChild.children];
  block.classList.add(`columns-${cols.length}-cols`);
  [...block.children].forEach((row) => {
    [...row.children].forEach((col) => {
      const pic = col.querySelector('picture');
      if (pic) {
        const picWrapper = pic.closest('div');
        if (picWrapper && picWrapper.children.length === 1) {
          picWrapper.classList.add('columns-img-col');
        }
      }
    });
  });
}
```
- columns.css:
```css
.columns > div {
  display: flex;
  flex-direction: column;
}
.columns img {
  width: 100%;
}
```

Strictly provide the folder/file structure as a tree view along with sample code for each file, as in the sample. Don't generate empty files."#;

pub const CREATE_SYSTEM_MESSAGE: &str = r#"Your task is to generate JSON for a new AEM Edge Delivery Services block, including JavaScript and CSS files and a markdown table representation, based on the provided requirements.
**Requirements:**
1. **Extract Block Name**: Extract the block name from the user's input.
2. **Generate Markdown Table**: Create a markdown table that reflects the structure of the block, one row per component of the block. The first row lists the block name only.
3. **Create Input HTML Structure** from the markdown table: each row is a <div>, each cell a nested <div>. Internal divs must not have classes, IDs or other attributes.
4. **Create Folder/File Structure**: generate block_name.js and block_name.css only.
5. **Functionality**: the block must be fully functional for its type.
6. **CSS Styling**: add fixed height and width for the block. Do not style from JavaScript.
7. **JavaScript**: the file exports a default function called 'decorate' that takes the block element and decorates it.
**Output Format**:
- Strictly generate valid JSON only, shaped as {"tree": {...}, "files": [...], "mdtable": "..."}.
- Generated code must be complete and functional, not placeholders.
- If unable to generate the code, answer "I can't help with that".
**Note**:
- Use the decorate function to add classes or ids for styling or functionality.
- Generate blocks with text only, no images or other media."#;

pub const CREATE_SAMPLE_USER_MESSAGE: &str = "a tabs block that show a list of tabs and their content";

pub const CREATE_SAMPLE_ASSISTANT_OUTPUT: &str = r#"{"tree":{"name":"tabs","type":"directory","children":[{"name":"tabs.js","type":"file"},{"name":"tabs.css","type":"file"}]},"files":[{"type":"javascript","path":"blocks/tabs/tabs.js","content":"export default async function decorate(block) {\n  const tablist = document.createElement('div');\n  tablist.className = 'tabs-list';\n  const tabs = [...block.children].map((child) => child.firstElementChild);\n  tabs.forEach((tab, i) => {\n    const tabpanel = block.children[i];\n    tabpanel.className = 'tabs-panel';\n    const button = document.createElement('button');\n    button.className = 'tabs-tab';\n    button.innerHTML = tab.innerHTML;\n    button.addEventListener('click', () => {\n      block.querySelectorAll('.tabs-panel').forEach((panel) => panel.setAttribute('aria-hidden', true));\n      tabpanel.setAttribute('aria-hidden', false);\n    });\n    tablist.append(button);\n    tab.remove();\n  });\n  block.prepend(tablist);\n}"},{"type":"css","path":"blocks/tabs/tabs.css","content":".tabs .tabs-list {\n  display: flex;\n  gap: 8px;\n}\n.tabs .tabs-panel[aria-hidden=\"true\"] {\n  display: none;\n}"}],"mdtable":"| Tabs |  |\n|------|--|\n| Tab One | tab one text |\n| Tab Two | tab two text |"}"#;

/// Vision prompt; `{blocks}` is replaced with the block list.
pub const VISION_SYSTEM_TEMPLATE: &str = r#"You are an expert customer support agent specializing in AEM projects, with deep knowledge of AEM Edge Delivery Services blocks.
Your responsibilities include:
- Analyze the image and find the most suited block from the given list of AEM Edge Delivery Services blocks.
- Return the name of the block that best matches the image.
- Also provide styling information for the block, to be passed to an AI model that enhances the block with that style.
- Provide the output in JSON format to be easily parsable.

sample output:
----
{
    "block": "hero",
    "style": "white background with blue text and a large image with small font size"
}

---- given list of AEM Edge Delivery Services blocks ----
{blocks}
----"#;

pub const ISSUES_SYSTEM_MESSAGE: &str = "You are a software product owner and you help your developers providing additional information for working on current software development task from github issue details.";

pub fn vision_system_message(blocks: &[String]) -> String {
    let list = blocks
        .iter()
        .map(|block| format!(" - {block}"))
        .collect::<Vec<_>>()
        .join("\n");
    VISION_SYSTEM_TEMPLATE.replace("{blocks}", &list)
}

pub fn block_list_markdown(heading: &str, blocks: &[String]) -> String {
    let mut out = format!("{heading}\n\n");
    for block in blocks {
        out.push_str("- ");
        out.push_str(block);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aem_block_collection::BlockTemplate;
    use pretty_assertions::assert_eq;

    #[test]
    fn sample_output_is_a_valid_template() {
        let template: BlockTemplate = serde_json::from_str(CREATE_SAMPLE_ASSISTANT_OUTPUT).unwrap();
        assert_eq!(template.tree.name, "tabs");
        assert_eq!(template.files.len(), 2);
    }

    #[test]
    fn vision_prompt_lists_blocks() {
        let prompt = vision_system_message(&["cards".to_string(), "hero".to_string()]);
        assert!(prompt.contains(" - cards\n - hero\n----"));
        assert!(!prompt.contains("{blocks}"));
    }

    #[test]
    fn block_list() {
        assert_eq!(
            block_list_markdown("List of available blocks:", &["cards".to_string(), "hero".to_string()]),
            "List of available blocks:\n\n- cards\n- hero\n"
        );
    }
}
