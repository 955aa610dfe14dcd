use crate::cli::Scenario;
use foundry_core::agent::AgentKind;
use foundry_core::tooling::ToolServerKind;

/// One scripted request: a banner printed before it and the input sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub banner: &'static str,
    pub input: &'static str,
}

/// Servers, agent profile and ordered requests for a demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub title: &'static str,
    pub servers: &'static [ToolServerKind],
    pub agent: AgentKind,
    pub steps: &'static [Step],
}

/// Scripts for the runnable scenarios. `Interactive` and `Help` have none.
pub fn script_for(scenario: Scenario) -> Option<&'static Script> {
    match scenario {
        Scenario::Filesystem => Some(&FILESYSTEM),
        Scenario::WebAutomation => Some(&WEB_AUTOMATION),
        Scenario::SourceControl => Some(&SOURCE_CONTROL),
        Scenario::StructuredReasoning => Some(&STRUCTURED_REASONING),
        Scenario::HttpFetch => Some(&HTTP_FETCH),
        Scenario::Combined => Some(&COMBINED),
        Scenario::ToolInspection => Some(&TOOL_INSPECTION),
        Scenario::Interactive | Scenario::Help => None,
    }
}

const FILESYSTEM: Script = Script {
    title: "filesystem",
    servers: &[ToolServerKind::Filesystem],
    agent: AgentKind::Filesystem,
    steps: &[
        Step {
            banner: "Listing files in sample_files",
            input: "Read the files in `sample_files` folder, and list them.",
        },
        Step {
            banner: "Creating a simple program",
            input: "Create a simple Python program called 'demo_hello.py' in the sample_files folder. The program should greet the user and ask for their name.",
        },
        Step {
            banner: "Asking about favorite books",
            input: "What is my #1 favorite book?",
        },
    ],
};

const WEB_AUTOMATION: Script = Script {
    title: "web automation",
    servers: &[ToolServerKind::WebAutomation],
    agent: AgentKind::WebAutomation,
    steps: &[Step {
        banner: "Asking the agent about its web tools",
        input: "What web automation tools do you have? List them briefly with examples of what each can do.",
    }],
};

const SOURCE_CONTROL: Script = Script {
    title: "GitHub",
    servers: &[ToolServerKind::SourceControl],
    agent: AgentKind::SourceControl,
    steps: &[
        Step {
            banner: "Analyzing the GitHub profile",
            input: "Analyze my GitHub profile. Show my most recent repositories (last 5) and overall activity statistics.",
        },
        Step {
            banner: "Reviewing open issues",
            input: "Review the open issues in my main repositories and give a summary of their current state.",
        },
    ],
};

const STRUCTURED_REASONING: Script = Script {
    title: "sequential thinking",
    servers: &[ToolServerKind::StructuredReasoning],
    agent: AgentKind::StructuredReasoning,
    steps: &[
        Step {
            banner: "Analyzing a complex problem step by step",
            input: "I need to design a software architecture for an e-commerce system that handles high concurrency, supports multiple payment methods, and supports internationalization. Analyze this step by step, considering all technical and business aspects.",
        },
        Step {
            banner: "Structured analysis of code improvements",
            input: "I have a Python system with performance problems. Users complain about slow database queries and a slow web interface. Systematically analyze the possible causes and solutions, considering both the backend and the frontend.",
        },
    ],
};

const HTTP_FETCH: Script = Script {
    title: "fetch",
    servers: &[ToolServerKind::HttpFetch],
    agent: AgentKind::HttpFetch,
    steps: &[
        Step {
            banner: "Checking available HTTP tools",
            input: "List your HTTP/API tools and capabilities briefly.",
        },
        Step {
            banner: "Making a test HTTP request",
            input: "Use your fetch tool to get data from https://httpbin.org/json and show me the response structure.",
        },
    ],
};

const COMBINED: Script = Script {
    title: "combined",
    servers: &[ToolServerKind::Filesystem, ToolServerKind::WebAutomation],
    agent: AgentKind::Combined,
    steps: &[Step {
        banner: "Asking about combined capabilities",
        input: "What are all your capabilities? List both file system and web automation tools you have available.",
    }],
};

const TOOL_INSPECTION: Script = Script {
    title: "tool inspection",
    servers: &[ToolServerKind::Filesystem],
    agent: AgentKind::ToolInspector,
    steps: &[
        Step {
            banner: "Inspecting available tools",
            input: "What tools do you have available? Please list all your capabilities and what each tool can do.",
        },
        Step {
            banner: "Asking for specific tool details",
            input: "Can you show me specifically what filesystem operations you can perform? What are the exact tool names and parameters?",
        },
    ],
};
