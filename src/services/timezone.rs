// src/services/timezone.rs

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

// Fuso horário fixo do negócio. O armazenamento é sempre UTC; este fuso
// só entra na exibição e na exportação.
pub const BUSINESS_TZ: Tz = chrono_tz::America::Chicago;

// Converte um instante armazenado (UTC) para o relógio de parede do negócio.
pub fn to_display(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&BUSINESS_TZ)
}

// Inverso: relógio de parede local -> instante UTC para persistência.
// Horários ambíguos na virada do horário de verão ficam com o primeiro
// offset; horários inexistentes passam direto como UTC (sem resolução
// especial, a conversão da base de fusos é aceita como está).
pub fn to_storage_instant(local: NaiveDateTime) -> DateTime<Utc> {
    match BUSINESS_TZ.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&local),
    }
}

// Formato usado no CSV: "1/15/2025, 12:00:00 PM"
pub fn format_display(instant: DateTime<Utc>) -> String {
    to_display(instant)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn winter_instants_display_in_cst() {
        // Janeiro: Chicago fica em UTC-6
        let display = to_display(utc(2025, 1, 15, 18, 0, 0));
        assert_eq!(format_display(utc(2025, 1, 15, 18, 0, 0)), "1/15/2025, 12:00:00 PM");
        assert_eq!(display.naive_local(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap().and_hms_opt(12, 0, 0).unwrap());
    }

    #[test]
    fn summer_instants_display_in_cdt() {
        // Julho: Chicago fica em UTC-5
        assert_eq!(format_display(utc(2025, 7, 4, 1, 30, 0)), "7/3/2025, 8:30:00 PM");
    }

    #[test]
    fn storage_instant_round_trips_display() {
        let instant = utc(2025, 1, 15, 18, 0, 0);
        let wall_clock = to_display(instant).naive_local();
        assert_eq!(to_storage_instant(wall_clock), instant);
    }

    #[test]
    fn ambiguous_fall_back_times_take_earliest_offset() {
        // 01:30 de 2025-11-02 acontece duas vezes; fica o offset CDT (-5)
        let local = NaiveDate::from_ymd_opt(2025, 11, 2)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert_eq!(to_storage_instant(local), utc(2025, 11, 2, 6, 30, 0));
    }
}
