#![no_std]
#![no_main]

use tfmpi2c::{
    consts::FRAME_100,
    recovery::recover_bus,
    Config as SensorConfig,
    Measurement,
    Tfmpi2c,
};

use panic_halt as _;
use cortex_m_rt::entry;

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use stm32f4xx_hal::{
    gpio::{
        gpioa,
        gpiob,
        Alternate,
        OpenDrain,
        Output,
        Pin,
        PinState::High},
    pac::{USART2, Peripherals, TIM1, TIM2},
    prelude::*,
    serial::{Config, Tx},
    timer::Delay,
    rcc::{Rcc, Clocks}
};

// I2C related imports
use stm32f4xx_hal::{
    pac::I2C1,
    i2c::{I2c as StmI2c, I2c1, Mode}};

fn write_measurement(tx: &mut Tx<USART2>, m: &Measurement) {
    writeln!(
        tx,
        "Dist:{dis:>5}cm  Flux:{flu:>6}  Temp:{tem:>3}C",
        dis=m.distance,
        flu=m.flux,
        tem=m.temperature
    ).unwrap();
}

#[entry]
fn main() -> ! {
    let dp: Peripherals = Peripherals::take().unwrap();
    let rcc: Rcc = dp.RCC.constrain();
    let clocks: Clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(48.MHz()).freeze();
    let mut tim_recovery: Delay<TIM2, 1000000> = dp.TIM2.delay_us(&clocks);
    let tim_sensor: Delay<TIM1, 1000> = dp.TIM1.delay_ms(&clocks);

    let gpioa: gpioa::Parts = dp.GPIOA.split();
    let gpiob: gpiob::Parts = dp.GPIOB.split();

    let tx_pin: Pin<'A', 2, Alternate<7>> = gpioa.pa2.into_alternate();

    let mut tx: Tx<USART2> = dp.USART2.tx(
        tx_pin,
        Config::default()
        .baudrate(115200.bps())
        .wordlength_8()
        .parity_none(),
        &clocks).unwrap();

    // The sensor may have been reset mid-transfer, free the bus before
    // handing the pins to the peripheral.
    let scl: Pin<'B', 8, Output<OpenDrain>> = gpiob.pb8.into_open_drain_output_in_state(High);
    let sda: Pin<'B', 9, Output<OpenDrain>> = gpiob.pb9.into_open_drain_output_in_state(High);
    let i2c1: I2C1 = dp.I2C1;

    let i2c: StmI2c<I2C1> = recover_bus(sda, scl, &mut tim_recovery, |sda, scl| {
        I2c1::new(
            i2c1,
            (scl.into_input(), sda.into_input()),
            Mode::Standard{frequency:100.kHz()},
            &clocks)
    }).unwrap();

    let mut sensor = Tfmpi2c::new_i2c(i2c, tim_sensor, SensorConfig::default());

    writeln!(tx, "\x1B[2J\x1B[HTFMini-Plus I2C demo application\n").unwrap();

    match sensor.get_firmware_version() {
        Ok([major, minor, revision]) => {
            writeln!(tx, "Firmware version: {}.{}.{}", major, minor, revision).unwrap();
        }
        Err(_) => {
            writeln!(tx, "Firmware version: {}", sensor.reply_dump()).unwrap();
        }
    }

    if sensor.set_frame_rate(FRAME_100).is_err() {
        writeln!(tx, "Frame rate: {}", sensor.reply_dump()).unwrap();
    }

    loop {
        match sensor.get_data() {
            Ok(m) => write_measurement(&mut tx, &m),
            // Advisory readings still carry the decoded frame
            Err(e) => match e.measurement() {
                Some(m) => {
                    write_measurement(&mut tx, &m);
                    writeln!(tx, "  {}", e.status()).unwrap();
                }
                None => writeln!(tx, "{}", sensor.frame_dump()).unwrap(),
            },
        }
        sensor.tim.delay_ms(50);
    }
}
