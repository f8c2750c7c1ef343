//! User-facing message strings.
//!
//! The product ships in Russian; keeping every user-visible string here keeps
//! the handlers free of literals and leaves one place to edit copy.

pub const SEARCH_PROMPT: &str =
    "Введите минимум 2 цифры номера вашего автомобиля для поиска.";
pub const SEARCH_TOO_SHORT: &str =
    "Слишком короткий запрос. Введите минимум 2 цифры номера.";
pub const SEARCH_NO_MATCHES: &str =
    "Автомобили не найдены. Проверьте цифры и попробуйте ещё раз.";
pub const SEARCH_CHOOSE: &str = "Выберите ваш автомобиль:";

pub const PLATE_TAKEN: &str =
    "🚫 Этот автомобиль уже закреплён за другим водителем. Попробуйте поискать ещё раз.";
pub const PLATE_CLAIMED: &str = "✅ Автомобиль закреплён за вами.";

pub const MENU_REGISTERED: &str = "Ваш автомобиль: {plate}. Что дальше?";
pub const MENU_CHECKIN: &str = "📸 Пройти осмотр";
pub const MENU_CHANGE_CAR: &str = "🔄 Сменить автомобиль";

pub const PHOTO_ONE_PROMPT: &str = "Пришлите первое фото автомобиля.";
pub const PHOTO_TWO_PROMPT: &str = "Пришлите второе фото автомобиля.";
pub const PHOTO_EXPECTED: &str = "Нужно именно фото. Пришлите фотографию автомобиля.";
pub const PLATE_PROMPT: &str = "Введите номер автомобиля.";
pub const PLATE_INVALID: &str =
    "Не похоже на номер автомобиля. Введите номер, например А333ВС.";
pub const INSPECTION_DONE: &str = "✅ Осмотр зафиксирован. Спасибо!";

pub const CAR_RELEASED: &str =
    "Закрепление снято. Найдите новый автомобиль по цифрам номера.";

pub const ADMIN_LIST_TITLE: &str = "Выберите автомобили и отправьте напоминание:";
pub const ADMIN_SEND_BUTTON: &str = "📤 Разослать напоминание";
pub const ADMIN_NOTHING_SELECTED: &str = "Сначала выберите хотя бы один автомобиль.";
pub const REMINDER_TEXT: &str =
    "📸 Пожалуйста, пришлите 2 фото вашего автомобиля и номер авто.";
pub const BROADCAST_SUMMARY: &str =
    "✅ Отправлено: {sent}, ошибок: {failed}, пропущено (нет водителя): {skipped}.";

pub const INVALID_INPUT: &str = "Не понимаю. Используйте /start, чтобы начать.";
pub const TRY_LATER: &str =
    "⚠️ Временная ошибка, попробуйте позже.";
pub const USE_START: &str = "Используйте /start, чтобы начать работу с ботом.";

pub const HELP: &str = "Бот учёта осмотров автопарка.\n\n\
/start — регистрация автомобиля и прохождение осмотра\n\
/changecar — сменить закреплённый автомобиль\n\
/help — эта справка";

/// Fill a single `{name}` placeholder in a template.
pub fn fill(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}
