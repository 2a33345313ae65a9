use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::Module;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    SwitchModule(Module),
    NextModule,
    // Collection
    Collect,
    CyclePlatform,
    EditKeyword,
    Import,
    // Materials
    CycleStatusFilter,
    CycleSourceFilter,
    CycleCategoryFilter,
    AdvanceStatus,
    DeleteArticle,
    DeleteFiltered,
    // Rewrite
    CycleStyle,
    EditPrompt,
    Rewrite,
    ApplyRewrite,
    // Illustration
    CycleParagraph,
    Illustrate,
    IllustrateAll,
    RegenerateImage,
    DeleteImage,
    // Publish
    CycleAccount,
    Publish,
    // Settings
    ToggleTheme,
    ToggleAutoRewrite,
    AddAccount,
    TestConnection,
    RemoveAccount,
    ShowHelp,
    HideHelp,
    // Text input actions
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    input_active: bool,
    show_help: bool,
    module: Module,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::InputConfirm),
            KeyCode::Esc => Some(AppAction::InputCancel),
            KeyCode::Backspace => Some(AppAction::InputBackspace),
            KeyCode::Char(c) => Some(AppAction::InputChar(c)),
            _ => None,
        };
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => return Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Some(AppAction::Quit),
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => return Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => return Some(AppAction::MoveUp),
        (KeyCode::Tab, _) => return Some(AppAction::NextModule),
        (KeyCode::Char('?'), _) => return Some(AppAction::ShowHelp),
        (KeyCode::Char(c @ '1'..='7'), _) => {
            let index = c as usize - '1' as usize;
            return Some(AppAction::SwitchModule(Module::ALL[index]));
        }
        _ => {}
    }

    // Module keys
    match (module, key.code) {
        (Module::Collection, KeyCode::Enter) => Some(AppAction::Collect),
        (Module::Collection, KeyCode::Char('p')) => Some(AppAction::CyclePlatform),
        (Module::Collection, KeyCode::Char('/')) => Some(AppAction::EditKeyword),
        (Module::Collection, KeyCode::Char('i')) => Some(AppAction::Import),

        (Module::Materials, KeyCode::Char('f')) => Some(AppAction::CycleStatusFilter),
        (Module::Materials, KeyCode::Char('m')) => Some(AppAction::AdvanceStatus),
        (Module::Materials, KeyCode::Char('s')) => Some(AppAction::CycleSourceFilter),
        (Module::Materials, KeyCode::Char('c')) => Some(AppAction::CycleCategoryFilter),
        (Module::Materials, KeyCode::Char('d')) => Some(AppAction::DeleteArticle),
        (Module::Materials, KeyCode::Char('D')) => Some(AppAction::DeleteFiltered),

        (Module::Rewrite, KeyCode::Char('s')) => Some(AppAction::CycleStyle),
        (Module::Rewrite, KeyCode::Char('e')) => Some(AppAction::EditPrompt),
        (Module::Rewrite, KeyCode::Enter) => Some(AppAction::Rewrite),
        (Module::Rewrite, KeyCode::Char('a')) => Some(AppAction::ApplyRewrite),

        (Module::Illustration, KeyCode::Char('p')) => Some(AppAction::CycleParagraph),
        (Module::Illustration, KeyCode::Char('e')) => Some(AppAction::EditPrompt),
        (Module::Illustration, KeyCode::Enter) => Some(AppAction::Illustrate),
        (Module::Illustration, KeyCode::Char('G')) => Some(AppAction::IllustrateAll),
        (Module::Illustration, KeyCode::Char('r')) => Some(AppAction::RegenerateImage),
        (Module::Illustration, KeyCode::Char('d')) => Some(AppAction::DeleteImage),

        (Module::Publish, KeyCode::Char('n')) => Some(AppAction::CycleAccount),
        (Module::Publish, KeyCode::Enter) => Some(AppAction::Publish),

        (Module::Settings, KeyCode::Char('t')) => Some(AppAction::ToggleTheme),
        (Module::Settings, KeyCode::Char('w')) => Some(AppAction::ToggleAutoRewrite),
        (Module::Settings, KeyCode::Char('a')) => Some(AppAction::AddAccount),
        (Module::Settings, KeyCode::Enter) => Some(AppAction::TestConnection),
        (Module::Settings, KeyCode::Char('x')) => Some(AppAction::RemoveAccount),

        _ => None,
    }
}
