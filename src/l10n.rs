//! English/Russian string table.
//!
//! The locale is resolved once at startup and carried by the render context;
//! nothing in here consults the environment on lookup.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Map a POSIX locale tag (`ru_RU.UTF-8`, `en_US`, `C`) to a supported locale.
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_lowercase().starts_with("ru") {
            Locale::Ru
        } else {
            Locale::En
        }
    }

    /// Resolve the locale from the usual environment variables, first non-empty wins.
    pub fn detect() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|value| !value.is_empty())
            .map(|value| Locale::from_tag(&value))
            .unwrap_or_default()
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::En),
            "ru" | "russian" => Ok(Locale::Ru),
            other => Err(format!("unsupported language '{}', expected 'en' or 'ru'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // Bootstrap
    Welcome,
    CheckingKeychain,
    CheckingSettings,
    CheckingAuthToken,
    InitializingClient,
    Authorizing,
    KeychainEntityNotFound,
    NecessaryTokensNotFound,
    NecessaryTokenNotFound,
    AuthTokenNotFound,
    AuthPrompt,
    AuthDeclined,
    AuthFailed,
    SmsCodeRequired,
    ValuePrompt,
    LoginPrompt,
    PasswordPrompt,
    SmsCodePrompt,
    ExplicitResponse,
    Writing,
    ReadyForInput,

    // Result labels
    SuccessLabel,
    FailureLabel,
    WarningLabel,
    FatalLabel,

    // Shell
    ParsingCommand,
    UnknownCommand,
    Help,
    Exiting,
    FetchingDevices,
    NoDevicesFound,
    FetchingStatus,
    CorruptedData,
    SettingNotFound,
    UnknownSettingKey,
    EmptyValue,
    AvailableSettings,
    SettingKeyPrompt,
    SettingValuePrompt,
    Arming,
    Disarming,
    StartingEngine,
    StoppingEngine,
    Honking,

    // Help lines
    HelpAllcars,
    HelpSet,
    HelpHelp,
    HelpExit,
    HelpStatus,
    HelpArm,
    HelpDisarm,
    HelpStart,
    HelpStop,
    HelpHonk,

    // Status block fields
    AliasField,
    StateField,
    PerimeterField,
    DoorsField,
    HoodField,
    TrunkField,
    ParkingBrakeField,
    IgnitionField,
    ArmField,
    AlarmField,
    ValetField,
    StayHomeField,
    GsmField,
    GpsField,
    BatteryField,
    TemperatureField,
    DistanceField,
    LastActivityField,

    // Generic labels
    Yes,
    No,
    Open,
    Closed,
    On,
    Off,
    Unknown,
    Poor,
    Normal,
    Good,
    Excellent,
    BrokenPerimeter,
    KilometerSuffix,
    VoltSuffix,
    CelsiusSuffix,

    // Lifecycle states
    StateArmed,
    StateDisarmed,
    StateRunning,
    StateAlarm,
    StateService,
    StateStayHome,
}

impl Message {
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Message::Welcome => ("Launching Cassiopeia...", "Запуск Cassiopeia..."),
            Message::CheckingKeychain => ("Checking keychain...", "Проверка связки ключей..."),
            Message::CheckingSettings => ("Checking settings...", "Проверка настроек..."),
            Message::CheckingAuthToken => ("Checking auth token", "Проверка токена"),
            Message::InitializingClient => ("Initializing API client", "Инициализация клиента API"),
            Message::Authorizing => ("Authorizing", "Авторизация"),
            Message::KeychainEntityNotFound => (
                "Entity not found in keychain",
                "Ключ не найден в связке ключей",
            ),
            Message::NecessaryTokensNotFound => (
                "Necessary tokens not found in keychain",
                "Необходимые ключи отсутствуют в связке",
            ),
            Message::NecessaryTokenNotFound => (
                "Necessary token not found in keychain",
                "Необходимый ключ отсутствует в связке",
            ),
            Message::AuthTokenNotFound => ("Auth token not found", "Токен авторизации отсутствует"),
            Message::AuthPrompt => ("Do you want to authorize?", "Хотите авторизоваться?"),
            Message::AuthDeclined => ("Authorization declined", "Авторизация отклонена"),
            Message::AuthFailed => ("Authorization failed", "Авторизация не удалась"),
            Message::SmsCodeRequired => (
                "SMS confirmation required",
                "Требуется подтверждение по СМС",
            ),
            Message::ValuePrompt => ("Enter it", "Внесите его"),
            Message::LoginPrompt => ("Enter login", "Введите логин"),
            Message::PasswordPrompt => ("Enter password", "Введите пароль"),
            Message::SmsCodePrompt => ("Enter SMS code", "Введите код из СМС"),
            Message::ExplicitResponse => (
                "Please state explicitly: 'yes' or 'no'",
                "Пожалуйста, ответьте явно: 'да' или 'нет'",
            ),
            Message::Writing => ("Writing", "Запись"),
            Message::ReadyForInput => (
                "Ready for input. Type 'help' for the list of commands.",
                "Готов к вводу. Введите 'help' для списка команд.",
            ),

            Message::SuccessLabel => ("[OKAY]", "[УСПЕХ]"),
            Message::FailureLabel => ("[FAIL]", "[ОШИБКА]"),
            Message::WarningLabel => ("[WARN]", "[ВНИМАНИЕ]"),
            Message::FatalLabel => ("FATAL", "КРИТИЧ"),

            Message::ParsingCommand => ("Parsing command", "Разбор команды"),
            Message::UnknownCommand => ("Unknown command", "Неизвестная команда"),
            Message::Help => ("Help", "Справка"),
            Message::Exiting => ("Exiting", "Выход"),
            Message::FetchingDevices => ("Fetching devices", "Получение устройств"),
            Message::NoDevicesFound => ("No devices found", "Устройства не найдены"),
            Message::FetchingStatus => ("Fetching device status", "Получение состояния устройства"),
            Message::CorruptedData => ("Corrupted data received", "Получены повреждённые данные"),
            Message::SettingNotFound => ("Setting not found", "Настройка не найдена"),
            Message::UnknownSettingKey => ("Unknown setting key", "Неизвестный ключ настройки"),
            Message::EmptyValue => ("Value must not be empty", "Значение не может быть пустым"),
            Message::AvailableSettings => ("Available settings:", "Доступные настройки:"),
            Message::SettingKeyPrompt => ("Enter setting key", "Введите ключ настройки"),
            Message::SettingValuePrompt => ("Enter setting value", "Введите значение настройки"),
            Message::Arming => ("Arming", "Постановка на охрану"),
            Message::Disarming => ("Disarming", "Снятие с охраны"),
            Message::StartingEngine => ("Starting engine", "Запуск двигателя"),
            Message::StoppingEngine => ("Stopping engine", "Остановка двигателя"),
            Message::Honking => ("Honking", "Сигнал"),

            Message::HelpAllcars => ("list all cars on the account", "список всех машин аккаунта"),
            Message::HelpSet => ("change a setting", "изменить настройку"),
            Message::HelpHelp => ("show this help", "показать эту справку"),
            Message::HelpExit => ("quit", "выйти"),
            Message::HelpStatus => ("show the selected car's status", "состояние выбранной машины"),
            Message::HelpArm => ("arm the alarm", "поставить на охрану"),
            Message::HelpDisarm => ("disarm the alarm", "снять с охраны"),
            Message::HelpStart => ("start the engine", "запустить двигатель"),
            Message::HelpStop => ("stop the engine", "остановить двигатель"),
            Message::HelpHonk => ("sound the horn", "подать звуковой сигнал"),

            Message::AliasField => ("Car", "Машина"),
            Message::StateField => ("State", "Состояние"),
            Message::PerimeterField => ("Perimeter", "Периметр"),
            Message::DoorsField => ("Doors", "Двери"),
            Message::HoodField => ("Hood", "Капот"),
            Message::TrunkField => ("Trunk", "Багажник"),
            Message::ParkingBrakeField => ("Parking brake", "Стояночный тормоз"),
            Message::IgnitionField => ("Ignition", "Зажигание"),
            Message::ArmField => ("Alarm armed", "Охрана"),
            Message::AlarmField => ("Alarm triggered", "Тревога"),
            Message::ValetField => ("Valet mode", "Сервисный режим"),
            Message::StayHomeField => ("Stay home mode", "Режим «Я дома»"),
            Message::GsmField => ("GSM signal", "Сигнал GSM"),
            Message::GpsField => ("GPS signal", "Сигнал GPS"),
            Message::BatteryField => ("Battery", "Аккумулятор"),
            Message::TemperatureField => ("Temperature", "Температура"),
            Message::DistanceField => ("Remaining distance", "Запас хода"),
            Message::LastActivityField => ("Last activity", "Последняя активность"),

            Message::Yes => ("yes", "да"),
            Message::No => ("no", "нет"),
            Message::Open => ("open", "открыто"),
            Message::Closed => ("closed", "закрыто"),
            Message::On => ("on", "вкл."),
            Message::Off => ("off", "выкл."),
            Message::Unknown => ("unknown", "неизвестно"),
            Message::Poor => ("poor", "плохой"),
            Message::Normal => ("normal", "нормальный"),
            Message::Good => ("good", "хороший"),
            Message::Excellent => ("excellent", "отличный"),
            Message::BrokenPerimeter => ("broken", "нарушен"),
            Message::KilometerSuffix => (" km", " км"),
            Message::VoltSuffix => (" v.", " в."),
            Message::CelsiusSuffix => (" °C", " °C"),

            Message::StateArmed => ("armed", "под охраной"),
            Message::StateDisarmed => ("disarmed", "снято с охраны"),
            Message::StateRunning => ("running", "двигатель запущен"),
            Message::StateAlarm => ("alarm", "тревога"),
            Message::StateService => ("service", "сервисный режим"),
            Message::StateStayHome => ("stay home", "режим «Я дома»"),
        }
    }

    pub fn text(self, locale: Locale) -> &'static str {
        let (en, ru) = self.pair();
        match locale {
            Locale::En => en,
            Locale::Ru => ru,
        }
    }

    /// The message in every supported locale, used to accept answers typed in either language.
    pub fn every(self) -> [&'static str; 2] {
        let (en, ru) = self.pair();
        [en, ru]
    }
}
