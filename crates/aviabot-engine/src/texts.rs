//! User-facing reply texts. Wording is part of the bot's observable
//! behavior, so it lives in one place.

pub fn greeting(name: &str) -> String {
    format!("Привет {name}! Я бот AviaBot.")
}

pub const GREETING_INTRO: &str = "Я создан для обработки заказов на авиарейсы.";
pub const GREETING_COMMANDS: &str = "Доступные команды: /ticket, /help, /cancel";

pub const HELP: &str = "Я бот AviaBot. Доступные команды: /start, /ticket, /help, /cancel";

pub const CANCELLED: &str = "Отменено.";

pub const ASK_CITY_FROM: &str = "Введите город отправления (на русском)";
pub const ASK_CITY_TO: &str = "Введите город назначения (на русском)";
pub const CONFIRM_CITY_FROM: &str = "Подтвердите город отправления (на русском)";
pub const CONFIRM_CITY_TO: &str = "Подтвердите город назначения (на русском)";
pub const NO_FLIGHTS_FROM: &str =
    "Из указанного города нет рейсов. Вы можете выбрать город из предложенных";
pub const NO_FLIGHTS_TO: &str =
    "В указанный город нет рейсов. Вы можете выбрать город из предложенных";
pub const NO_FLIGHTS_FROM_ABORT: &str =
    "Из указанного города нет рейсов\nДля повторного запуска бота - /ticket";
pub const NO_FLIGHTS_TO_ABORT: &str =
    "В указанный город нет рейсов\nДля повторного запуска бота - /ticket";
pub const CITIES_MUST_DIFFER: &str = "Города отправления и город назначения должны быть разными\n\
     Для повторного запуска бота введите /ticket";

pub const ASK_DATE: &str = "Введите дату вылета в формате 05-11-2021";
pub const DATE_REMINDER: &str = "Введите дату вылета в формате 05-11-2021\n\
     Информация о полетах доступна на год вперед\n\
     На вчера купить билеты нельзя";

pub const ASK_FLIGHT: &str = "Выберите рейс из предложенных ниже";
pub const FLIGHT_RANGE_REMINDER: &str = "Выберите номер рейса от 1 до 5";

pub const ASK_SEATS: &str = "Выберите количество мест от 1 до 5";

pub const ASK_COMMENT: &str = "Напишите дополнительные сведения о полете (комментарий)";

pub const ASK_CONFIRM: &str = "Верны ли введенные данные? Да/Нет";
pub const RESTART_FOR_NEW_ORDER: &str = "Для повторного заказа билетов введите /ticket";

pub const ASK_PHONE: &str = "Укажите номер телефона для связи с Вами";
pub const PHONE_REMINDER: &str =
    "Некорректный номер телефона, введите номер телефона для связи с Вами";

pub const YOUR_TICKET: &str = "Ваш электронный билет:";

pub fn chosen_option(index: usize) -> String {
    format!("Выбран вариант {index}")
}

pub fn thanks(phone: &str) -> String {
    format!("Спасибо за регистрацию. С вами свяжутся по указанному номеру телефона: {phone}")
}

pub fn flight_summary(
    city_from: &str,
    city_to: &str,
    departure: &str,
    arrival: &str,
    hours: u32,
) -> String {
    format!("{city_from} {departure} - {city_to} {arrival}\nчасов в полете - {hours}")
}

pub fn order_summary(flight: &str, seats: u32, comment: &str) -> String {
    format!("Выбранный рейс:\n{flight}\nКоличество мест: {seats}\nВаш комментарий: {comment}")
}
